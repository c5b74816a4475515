use anyhow::Context;
use async_trait::async_trait;

use crate::auth::repo_types::{Account, Role};
use crate::store::{
    postgres::PgQueryAs, Collection, MemCollection, PgCollection, PgDocument, StoreError,
};

impl PgDocument for Account {
    const TABLE: &'static str = "accounts";
    const COLUMNS: &'static [&'static str] = &[
        "name",
        "gender",
        "email",
        "contact_no",
        "address",
        "password_hash",
        "image",
        "role",
        "otp",
        "otp_expires_at",
        "is_admin",
    ];

    fn bind_columns<'q>(&'q self, query: PgQueryAs<'q, Self>) -> PgQueryAs<'q, Self> {
        query
            .bind(&self.name)
            .bind(&self.gender)
            .bind(&self.email)
            .bind(&self.contact_no)
            .bind(&self.address)
            .bind(&self.password_hash)
            .bind(&self.image)
            .bind(self.role.as_str())
            .bind(&self.otp)
            .bind(self.otp_expires_at)
            .bind(self.is_admin)
    }
}

/// Account lookups beyond plain CRUD.
#[async_trait]
pub trait AccountStore: Collection<Account> {
    /// First account whose contact number equals any of `candidates`.
    async fn find_by_contact(&self, candidates: &[String]) -> Result<Option<Account>, StoreError>;

    async fn find_by_email(&self, email: &str) -> Result<Option<Account>, StoreError>;

    async fn find_by_email_or_contact(
        &self,
        email: &str,
        contact_no: &str,
    ) -> Result<Option<Account>, StoreError>;

    async fn list_by_role(&self, role: Role) -> Result<Vec<Account>, StoreError>;
}

#[async_trait]
impl AccountStore for PgCollection<Account> {
    async fn find_by_contact(&self, candidates: &[String]) -> Result<Option<Account>, StoreError> {
        let account = sqlx::query_as::<_, Account>(
            r#"
            SELECT * FROM accounts
            WHERE contact_no = ANY($1)
            ORDER BY created_at ASC
            LIMIT 1
            "#,
        )
        .bind(candidates.to_vec())
        .fetch_optional(self.pool())
        .await
        .context("find account by contact")?;
        Ok(account)
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<Account>, StoreError> {
        let account = sqlx::query_as::<_, Account>(
            r#"SELECT * FROM accounts WHERE email = lower($1)"#,
        )
        .bind(email.trim())
        .fetch_optional(self.pool())
        .await
        .context("find account by email")?;
        Ok(account)
    }

    async fn find_by_email_or_contact(
        &self,
        email: &str,
        contact_no: &str,
    ) -> Result<Option<Account>, StoreError> {
        let account = sqlx::query_as::<_, Account>(
            r#"
            SELECT * FROM accounts
            WHERE email = lower($1) OR contact_no = $2
            LIMIT 1
            "#,
        )
        .bind(email.trim())
        .bind(contact_no)
        .fetch_optional(self.pool())
        .await
        .context("find account by email or contact")?;
        Ok(account)
    }

    async fn list_by_role(&self, role: Role) -> Result<Vec<Account>, StoreError> {
        let accounts = sqlx::query_as::<_, Account>(
            r#"SELECT * FROM accounts WHERE role = $1 ORDER BY created_at ASC"#,
        )
        .bind(role.as_str())
        .fetch_all(self.pool())
        .await
        .context("list accounts by role")?;
        Ok(accounts)
    }
}

#[async_trait]
impl AccountStore for MemCollection<Account> {
    async fn find_by_contact(&self, candidates: &[String]) -> Result<Option<Account>, StoreError> {
        self.find_first(|a| candidates.iter().any(|c| *c == a.contact_no))
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<Account>, StoreError> {
        let email = email.trim();
        self.find_first(|a| a.email.as_deref().is_some_and(|e| e.eq_ignore_ascii_case(email)))
    }

    async fn find_by_email_or_contact(
        &self,
        email: &str,
        contact_no: &str,
    ) -> Result<Option<Account>, StoreError> {
        let email = email.trim();
        self.find_first(|a| {
            a.contact_no == contact_no
                || a.email.as_deref().is_some_and(|e| e.eq_ignore_ascii_case(email))
        })
    }

    async fn list_by_role(&self, role: Role) -> Result<Vec<Account>, StoreError> {
        self.filter(|a| a.role == role)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::repo_types::NewAdmin;
    use time::OffsetDateTime;

    fn user(contact: &str) -> Account {
        Account::pending_user(contact.into(), "1111".into(), OffsetDateTime::now_utc())
    }

    #[tokio::test]
    async fn contact_lookup_accepts_any_candidate() {
        let store = MemCollection::<Account>::new();
        store.insert(user("+919876543210")).await.unwrap();

        let found = store
            .find_by_contact(&["9876543210".into(), "+919876543210".into()])
            .await
            .unwrap();
        assert!(found.is_some());
        assert!(store.find_by_contact(&["123".into()]).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn email_lookup_ignores_case() {
        let store = MemCollection::<Account>::new();
        store
            .insert(Account::admin(NewAdmin {
                name: "A".into(),
                gender: "male".into(),
                email: "Admin@Shop.io".into(),
                contact_no: "9000000000".into(),
                password_hash: "h".into(),
            }))
            .await
            .unwrap();
        assert!(store.find_by_email("ADMIN@shop.io").await.unwrap().is_some());
        assert!(store
            .find_by_email_or_contact("nobody@shop.io", "9000000000")
            .await
            .unwrap()
            .is_some());
    }

    #[tokio::test]
    async fn duplicate_contact_conflicts() {
        let store = MemCollection::<Account>::new();
        store.insert(user("9876543210")).await.unwrap();
        let err = store.insert(user("9876543210")).await.unwrap_err();
        assert!(matches!(err, StoreError::Conflict));
    }

    #[tokio::test]
    async fn list_by_role_filters() {
        let store = MemCollection::<Account>::new();
        store.insert(user("1")).await.unwrap();
        store.insert(user("2")).await.unwrap();
        assert_eq!(store.list_by_role(Role::User).await.unwrap().len(), 2);
        assert!(store.list_by_role(Role::Admin).await.unwrap().is_empty());
    }
}
