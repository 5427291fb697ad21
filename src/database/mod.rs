use mongodb::bson::doc;
use mongodb::options::IndexOptions;
use mongodb::{Client, Collection, Database, IndexModel};
use std::error::Error;

// Collection names. Services reference these instead of free string literals
// so every collection a handler touches is an explicit dependency.
pub const USERS: &str = "users";
pub const WORK_SHEETS: &str = "workSheets";
pub const PAYMENTS: &str = "payments";
pub const MESSAGES: &str = "messages";

#[derive(Clone)]
pub struct MongoDB {
    client: Client,
    db: Database,
}

impl MongoDB {
    pub async fn new(uri: &str, db_name: &str) -> Result<Self, Box<dyn Error>> {
        let mut client_options = mongodb::options::ClientOptions::parse(uri).await?;

        // Connection pool with explicit lifecycle instead of a bare global handle
        client_options.max_pool_size = Some(20);
        client_options.min_pool_size = Some(5);
        client_options.max_idle_time = Some(std::time::Duration::from_secs(300));

        client_options.connect_timeout = Some(std::time::Duration::from_secs(5));
        client_options.server_selection_timeout = Some(std::time::Duration::from_secs(5));

        let client = Client::with_options(client_options)?;
        let db = client.database(db_name);

        // Test connection
        db.list_collection_names().await?;

        let mongodb = Self { client, db };
        mongodb.ensure_indexes().await?;

        Ok(mongodb)
    }

    /// Creates the indexes the query paths rely on. The unique index on
    /// `users.email` closes the check-then-insert race in user creation.
    async fn ensure_indexes(&self) -> Result<(), Box<dyn Error>> {
        log::info!("🔧 Creating database indexes...");

        let users = self.db.collection::<mongodb::bson::Document>(USERS);
        let email_unique = IndexModel::builder()
            .keys(doc! { "email": 1 })
            .options(IndexOptions::builder().unique(true).build())
            .build();
        match users.create_index(email_unique).await {
            Ok(_) => log::info!("   ✅ Index created: users(email) unique"),
            Err(e) => log::debug!("   ℹ️  Index already exists: {}", e),
        }

        // Pagination sort order for /employee-list
        let payments = self.db.collection::<mongodb::bson::Document>(PAYMENTS);
        let pay_period = IndexModel::builder()
            .keys(doc! { "payYear": 1, "payMonth": 1 })
            .build();
        match payments.create_index(pay_period).await {
            Ok(_) => log::info!("   ✅ Index created: payments(payYear, payMonth)"),
            Err(e) => log::debug!("   ℹ️  Index already exists: {}", e),
        }

        let work_sheets = self.db.collection::<mongodb::bson::Document>(WORK_SHEETS);
        let sheet_email = IndexModel::builder().keys(doc! { "email": 1 }).build();
        match work_sheets.create_index(sheet_email).await {
            Ok(_) => log::info!("   ✅ Index created: workSheets(email)"),
            Err(e) => log::debug!("   ℹ️  Index already exists: {}", e),
        }

        // The /progress filter queries by employee name and date range
        let sheet_progress = IndexModel::builder()
            .keys(doc! { "name": 1, "date": 1 })
            .build();
        match work_sheets.create_index(sheet_progress).await {
            Ok(_) => log::info!("   ✅ Index created: workSheets(name, date)"),
            Err(e) => log::debug!("   ℹ️  Index already exists: {}", e),
        }

        log::info!("✅ Database indexes ready");

        Ok(())
    }

    pub fn collection<T: Send + Sync>(&self, name: &str) -> Collection<T> {
        self.db.collection(name)
    }

    pub fn database(&self) -> &Database {
        &self.db
    }

    pub fn client(&self) -> &Client {
        &self.client
    }
}
