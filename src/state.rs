use std::sync::Arc;

use anyhow::Context;
use sqlx::{postgres::PgPoolOptions, PgPool};
use tracing::{info, warn};

use crate::{
    auth::{
        repo::AccountStore,
        repo_types::Account,
        sms::{LogOnlySender, OtpSender, TwilioSender},
    },
    billing::BillingAddress,
    categories::Category,
    config::AppConfig,
    coupons::Coupon,
    media::{LocalMediaStore, MediaStore},
    offers::Offer,
    policies::PrivacyPolicy,
    store::{Collection, MemCollection, PgCollection},
    subcategories::SubCategory,
    units::Unit,
};

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub accounts: Arc<dyn AccountStore>,
    pub categories: Arc<dyn Collection<Category>>,
    pub sub_categories: Arc<dyn Collection<SubCategory>>,
    pub coupons: Arc<dyn Collection<Coupon>>,
    pub offers: Arc<dyn Collection<Offer>>,
    pub units: Arc<dyn Collection<Unit>>,
    pub policies: Arc<dyn Collection<PrivacyPolicy>>,
    pub billing: Arc<dyn Collection<BillingAddress>>,
    pub media: Arc<dyn MediaStore>,
    pub sms: Arc<dyn OtpSender>,
}

impl AppState {
    pub async fn init() -> anyhow::Result<Self> {
        let config = Arc::new(AppConfig::from_env()?);

        let media = Arc::new(LocalMediaStore::new(
            config.media.root.clone(),
            &config.media.url_prefix,
        )) as Arc<dyn MediaStore>;

        let sms: Arc<dyn OtpSender> = match &config.twilio {
            Some(twilio) => Arc::new(TwilioSender::new(twilio).context("build twilio client")?),
            None => {
                warn!("twilio credentials not set; OTPs will only be logged");
                Arc::new(LogOnlySender)
            }
        };

        let state = match &config.database_url {
            Some(url) => {
                let db = PgPoolOptions::new()
                    .max_connections(10)
                    .connect(url)
                    .await
                    .context("connect to database")?;

                if let Err(e) = sqlx::migrate!("./migrations").run(&db).await {
                    warn!(error = %e, "migration failed; continuing");
                }
                info!("using postgres document store");
                Self::postgres(db, config, media, sms)
            }
            None => {
                warn!("DATABASE_URL not set; records are kept in memory and lost on exit");
                Self::in_memory(config, media, sms)
            }
        };
        Ok(state)
    }

    pub fn postgres(
        db: PgPool,
        config: Arc<AppConfig>,
        media: Arc<dyn MediaStore>,
        sms: Arc<dyn OtpSender>,
    ) -> Self {
        Self {
            config,
            accounts: Arc::new(PgCollection::<Account>::new(db.clone())),
            categories: Arc::new(PgCollection::<Category>::new(db.clone())),
            sub_categories: Arc::new(PgCollection::<SubCategory>::new(db.clone())),
            coupons: Arc::new(PgCollection::<Coupon>::new(db.clone())),
            offers: Arc::new(PgCollection::<Offer>::new(db.clone())),
            units: Arc::new(PgCollection::<Unit>::new(db.clone())),
            policies: Arc::new(PgCollection::<PrivacyPolicy>::new(db.clone())),
            billing: Arc::new(PgCollection::<BillingAddress>::new(db)),
            media,
            sms,
        }
    }

    pub fn in_memory(
        config: Arc<AppConfig>,
        media: Arc<dyn MediaStore>,
        sms: Arc<dyn OtpSender>,
    ) -> Self {
        Self {
            config,
            accounts: Arc::new(MemCollection::<Account>::new()),
            categories: Arc::new(MemCollection::<Category>::new()),
            sub_categories: Arc::new(MemCollection::<SubCategory>::new()),
            coupons: Arc::new(MemCollection::<Coupon>::new()),
            offers: Arc::new(MemCollection::<Offer>::new()),
            units: Arc::new(MemCollection::<Unit>::new()),
            policies: Arc::new(MemCollection::<PrivacyPolicy>::new()),
            billing: Arc::new(MemCollection::<BillingAddress>::new()),
            media,
            sms,
        }
    }

    /// In-memory stores and a fixed signing key.
    #[cfg(test)]
    pub fn fake(media: Arc<dyn MediaStore>) -> Self {
        use std::path::PathBuf;

        use crate::config::{JwtConfig, MediaConfig};

        let config = Arc::new(AppConfig {
            database_url: None,
            jwt: JwtConfig {
                secret: "test".into(),
                issuer: "test".into(),
                audience: "test".into(),
                ttl_minutes: 5,
            },
            media: MediaConfig {
                root: PathBuf::from("public"),
                url_prefix: "/public".into(),
            },
            twilio: None,
        });
        Self::in_memory(config, media, Arc::new(LogOnlySender))
    }
}
