use std::path::PathBuf;

use diesel::{RunQueryDsl, SelectableHelper};
use fake::{faker::name::en::Name, Fake};
use marketplace::{
    auth::jwt::Tokenizer,
    configuration::Settings,
    domain::capabilities::Capabilities,
    models::{NewProductRow, NewUser, Product, ProductRow, User},
    schema::{products, users},
    startup::Application,
    telemetry::{get_subscriber, init_subscriber},
    utils::{get_connection_pool, DbPool}
};
use once_cell::sync::Lazy;
use reqwest::redirect::Policy;
use uuid::Uuid;

static LOGGER_INSTANCE: Lazy<()> = Lazy::new(|| {
    let log_level = "info".to_string();
    let name = "marketplace-test".to_string();

    if std::env::var("TEST_LOG").is_ok() {
        let subscriber = get_subscriber(name, log_level, std::io::stdout);
        init_subscriber(subscriber).expect("Failed to set subscriber");
    } else {
        let subscriber = get_subscriber(name, log_level, std::io::sink);
        init_subscriber(subscriber).expect("Failed to set subscriber");
    }
});

pub struct TestUser{
    pub id: i32,
    pub token: String
}

pub struct TestApp{
    pub host: String,
    pub port: u16,
    pub pool: DbPool,
    pub tokenizer: Tokenizer,
    pub api_client: reqwest::Client,
    db_path: PathBuf
}

impl TestApp {
    pub async fn spawn_app() -> TestApp{
        Lazy::force(&LOGGER_INSTANCE);

        let db_path = std::env::temp_dir().join(format!("marketplace-test-{}.db", Uuid::new_v4()));

        let mut settings = Settings::get().expect("Failed to read configuration");
        settings.application.port = 0;
        settings.database.path = db_path.to_string_lossy().into_owned();

        let database = settings.database.clone();
        let tokenizer = Tokenizer::new(&settings.jwt);

        let application = Application::new(settings)
                            .await
                            .expect("Failed to build application");

        let host = application.host.clone();
        let port = application.port;
        tokio::task::spawn(application.run_until_stopped());

        let pool = get_connection_pool(&database)
            .expect("Failed to build connection pool to test database");

        let api_client = reqwest::Client::builder()
                            .redirect(Policy::none())
                            .build()
                            .unwrap();

        TestApp{
            host,
            port,
            pool,
            tokenizer,
            api_client,
            db_path
        }
    }

    pub fn get_app_url(&self) -> String{
        format!("http://{}:{}", self.host, self.port)
    }

    // Inserts a user straight into the database and signs a token for it,
    // skipping the password hashing of the registration endpoint
    pub fn seed_user(&self, capabilities: Capabilities) -> TestUser{
        let mut conn = self.pool.get().unwrap();
        let name: String = Name().fake();

        let user: User = diesel::insert_into(users::table)
            .values(NewUser{
                email: format!("{}@example.com", Uuid::new_v4()),
                phone: "+16502530000".to_string(),
                name,
                password_hash: "not-a-real-hash".to_string(),
                can_buy: capabilities.can_buy,
                can_sell: capabilities.can_sell
            })
            .returning(User::as_returning())
            .get_result(&mut conn)
            .unwrap();

        TestUser{
            id: user.id,
            token: self.tokenizer.generate_key(&user).unwrap()
        }
    }

    pub fn seed_product(&self, seller_id: i32, price: &str, stock: i32) -> Product{
        let mut conn = self.pool.get().unwrap();

        let row: ProductRow = diesel::insert_into(products::table)
            .values(NewProductRow{
                name: "Desk lamp".to_string(),
                price: price.to_string(),
                rating: 4.2,
                description: r#"["brass", "warm light"]"#.to_string(),
                image_url: "https://img.example.com/lamp.png".to_string(),
                seller_id,
                stock
            })
            .returning(ProductRow::as_returning())
            .get_result(&mut conn)
            .unwrap();

        Product::try_from(row).unwrap()
    }

    pub fn stock_of(&self, product_id: i32) -> i32{
        use diesel::QueryDsl;

        let mut conn = self.pool.get().unwrap();
        products::table
            .find(product_id)
            .select(products::stock)
            .first::<i32>(&mut conn)
            .unwrap()
    }

    pub fn order_count(&self) -> i64{
        use diesel::QueryDsl;
        use marketplace::schema::orders;

        let mut conn = self.pool.get().unwrap();
        orders::table
            .count()
            .get_result::<i64>(&mut conn)
            .unwrap()
    }

    pub async fn post_register(&self, body: &serde_json::Value) -> reqwest::Response{
        self.api_client.post(format!("{}/register", self.get_app_url()))
            .json(body)
            .send()
            .await
            .expect("Failed to send request to register endpoint")
    }

    pub async fn post_login(&self, body: &serde_json::Value) -> reqwest::Response{
        self.api_client.post(format!("{}/login", self.get_app_url()))
            .json(body)
            .send()
            .await
            .expect("Failed to send request to login endpoint")
    }

    pub async fn post_product(&self, token: &str, body: &serde_json::Value) -> reqwest::Response{
        self.api_client.post(format!("{}/products", self.get_app_url()))
            .bearer_auth(token)
            .json(body)
            .send()
            .await
            .expect("Failed to send request to products endpoint")
    }

    pub async fn post_purchase(&self, token: &str, body: &serde_json::Value) -> reqwest::Response{
        self.api_client.post(format!("{}/purchases", self.get_app_url()))
            .bearer_auth(token)
            .json(body)
            .send()
            .await
            .expect("Failed to send request to purchases endpoint")
    }

    pub async fn purchase(&self, token: &str, product_id: i32, quantity: i64) -> reqwest::Response{
        self.post_purchase(token, &serde_json::json!({
            "productId": product_id,
            "quantity": quantity
        }))
        .await
    }

    pub async fn get_authed(&self, path: &str, token: &str) -> reqwest::Response{
        self.api_client.get(format!("{}{}", self.get_app_url(), path))
            .bearer_auth(token)
            .send()
            .await
            .expect("Failed to send request")
    }
}

impl Drop for TestApp {
    fn drop(&mut self) {
        for suffix in ["", "-wal", "-shm"] {
            let mut path = self.db_path.clone().into_os_string();
            path.push(suffix);
            let _ = std::fs::remove_file(path);
        }
    }
}

pub async fn error_body(response: reqwest::Response) -> serde_json::Value{
    response.json::<serde_json::Value>().await.expect("Error body was not JSON")
}
