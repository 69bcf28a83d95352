use std::sync::Arc;

use sea_orm::DatabaseConnection;
use tracing::info;

use configs::AppConfig;
use service::{
    api_log::ApiLogger,
    auth::{repo::seaorm::SeaOrmAuthRepository, AuthService},
    checkout::{
        payment::{OfflineGateway, PaymentGateway, RazorpayGateway},
        CheckoutService,
    },
    config_service::ConfigService,
    invoice::{ChromiumPdf, InvoiceService},
    notify::Notifier,
    repository::Repository,
    shipping::{Carriers, ShipmentService},
};

/// Everything a handler needs, cloned per request.
#[derive(Clone)]
pub struct ServerState {
    pub db: Arc<DatabaseConnection>,
    pub cfg: Arc<AppConfig>,
    pub auth: Arc<AuthService<SeaOrmAuthRepository>>,
    pub catalog: ConfigService,
    pub checkout: Arc<CheckoutService>,
    pub invoices: InvoiceService,
    pub shipments: ShipmentService,
}

impl ServerState {
    /// Wire services from configuration. The payment section must already be
    /// valid; notification and carrier providers without credentials fall back
    /// to logging implementations.
    pub fn new(db: DatabaseConnection, cfg: AppConfig) -> anyhow::Result<Self> {
        cfg.payment.validate()?;
        let db = Arc::new(db);
        let api_log = ApiLogger::new(Arc::clone(&db));
        let gateway: Arc<dyn PaymentGateway> = match cfg.payment.provider.as_str() {
            "offline" => Arc::new(OfflineGateway),
            _ => Arc::new(RazorpayGateway::new(&cfg.payment, api_log.clone())),
        };
        let notifier = Notifier::from_config(cfg.smtp.as_ref(), cfg.sms.as_ref(), api_log.clone())?;
        let carriers = Carriers::from_config(&cfg.shipping, api_log)?;
        info!(
            payment = gateway.provider(),
            smtp = cfg.smtp.is_some(),
            sms = cfg.sms.is_some(),
            carriers = ?carriers.names(),
            "providers configured"
        );

        let auth = AuthService::new(Arc::new(SeaOrmAuthRepository { db: Arc::clone(&db) }), (&cfg.auth).into());
        let checkout = CheckoutService::new(Arc::clone(&db), &cfg, gateway, notifier);
        let invoices = InvoiceService::new(Arc::clone(&db), &cfg.company, Arc::new(ChromiumPdf::new(&cfg.invoice)));
        let shipments = ShipmentService::new(Arc::clone(&db), carriers, &cfg.company);
        Ok(Self {
            catalog: ConfigService::new(Repository::new(Arc::clone(&db))),
            db,
            cfg: Arc::new(cfg),
            auth: Arc::new(auth),
            checkout: Arc::new(checkout),
            invoices,
            shipments,
        })
    }
}
