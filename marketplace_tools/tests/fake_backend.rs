use actix_web::{dev::ServerHandle, get, post, web, App, HttpResponse, HttpServer};
use log::*;
use marketplace_tools::{MarketplaceApi, MarketplaceApiError, MarketplaceConfig, OrderNumber, SendMessageRequest};
use serde::Deserialize;
use serde_json::{json, Value};

const ORDERS_JSON: &str = r#"{"orders": [
  {"marketplace": "Shopee", "order_number": "SHP-1", "status": "READY_TO_SHIP", "create_time": 1714550400,
   "items": [{"sku": "MUG-WHT-01", "model_sku": "MUG-WHT", "paid_price": "299.00"}]},
  {"marketplace": "Lazada", "order_number": 578214993, "status": "pending", "created_at": "2024-05-01"}
]}"#;

#[get("/marketplace/get_all_orders")]
async fn all_orders() -> HttpResponse {
    HttpResponse::Ok().content_type("application/json").body(ORDERS_JSON)
}

#[derive(Deserialize)]
struct InventoryQuery {
    sku: String,
    model_sku: String,
}

#[get("/storehub/inventory_check")]
async fn inventory_check(query: web::Query<InventoryQuery>) -> HttpResponse {
    if query.sku == "TS-BLK-L-01" && query.model_sku == "TS-BLK-L" {
        HttpResponse::Ok().json(json!({"inventory": [{
            "sku": "TS-BLK-L-01",
            "model_sku": "TS-BLK-L",
            "product_name": "Cotton T-Shirt Black L",
            "branches": [{"branch_name": "Bangkok HQ", "quantity": 12, "has_stock": true}]
        }]}))
    } else {
        HttpResponse::Ok().json(json!({"inventory": []}))
    }
}

#[post("/line/send_message")]
async fn send_message(body: web::Json<Value>) -> HttpResponse {
    HttpResponse::Ok().json(json!({"status": "sent", "echo": body.into_inner()}))
}

fn healthy(cfg: &mut web::ServiceConfig) {
    cfg.service(all_orders).service(inventory_check).service(send_message);
}

fn failing(cfg: &mut web::ServiceConfig) {
    cfg.route(
        "/marketplace/get_all_orders",
        web::get().to(|| async { HttpResponse::InternalServerError().body("database is down") }),
    );
}

fn garbled(cfg: &mut web::ServiceConfig) {
    cfg.route("/marketplace/get_all_orders", web::get().to(|| async { HttpResponse::Ok().body("<html>oops</html>") }));
}

fn start_backend(config: fn(&mut web::ServiceConfig)) -> (MarketplaceApi, ServerHandle) {
    let server = HttpServer::new(move || App::new().configure(config))
        .workers(1)
        .bind(("127.0.0.1", 0))
        .expect("Could not bind fake backend");
    let addr = server.addrs()[0];
    let server = server.run();
    let handle = server.handle();
    actix_web::rt::spawn(server);
    info!("🌍️ Fake backend listening on {addr}");
    let config = MarketplaceConfig::new(&format!("http://{addr}/"));
    let api = MarketplaceApi::new(config).expect("Could not create api client");
    (api, handle)
}

#[actix_web::test]
async fn fetch_all_orders() {
    let _ = env_logger::try_init();
    let (api, handle) = start_backend(healthy);
    let orders = api.get_all_orders().await.expect("Fetch failed");
    assert_eq!(orders.len(), 2);
    assert_eq!(orders[0].order_number, OrderNumber::Text("SHP-1".into()));
    assert_eq!(orders[0].items[0].paid_price, "299.00");
    assert_eq!(orders[1].order_number, OrderNumber::Number(578_214_993));
    assert_eq!(orders[1].created_at.as_deref(), Some("2024-05-01"));
    handle.stop(true).await;
}

#[actix_web::test]
async fn inventory_lookup_sends_query_params() {
    let _ = env_logger::try_init();
    let (api, handle) = start_backend(healthy);
    let items = api.inventory_check("TS-BLK-L-01", "TS-BLK-L").await.expect("Lookup failed");
    assert_eq!(items.len(), 1);
    assert_eq!(items[0].branches[0].quantity, 12);
    let items = api.inventory_check("NOPE", "NOPE").await.expect("Lookup failed");
    assert!(items.is_empty());
    handle.stop(true).await;
}

#[actix_web::test]
async fn send_message_posts_json() {
    let _ = env_logger::try_init();
    let (api, handle) = start_backend(healthy);
    let request = SendMessageRequest {
        user_id: "U0001".into(),
        message: "Sku: MUG-WHT-01 จำนวน 2 ชิ้น จากสาขา Bangkok HQ".into(),
        image_url: "https://cdn.example.com/img/mug-wht.jpg".into(),
    };
    let response = api.send_message(&request).await.expect("Send failed");
    assert_eq!(response["status"], "sent");
    assert_eq!(response["echo"]["user_id"], "U0001");
    assert_eq!(response["echo"]["image_url"], "https://cdn.example.com/img/mug-wht.jpg");
    handle.stop(true).await;
}

#[actix_web::test]
async fn http_errors_keep_their_status() {
    let _ = env_logger::try_init();
    let (api, handle) = start_backend(failing);
    match api.get_all_orders().await {
        Err(MarketplaceApiError::QueryError { status, message }) => {
            assert_eq!(status, 500);
            assert_eq!(message, "database is down");
        },
        other => panic!("Expected a query error, got {other:?}"),
    }
    handle.stop(true).await;
}

#[actix_web::test]
async fn garbled_responses_are_decoding_errors() {
    let _ = env_logger::try_init();
    let (api, handle) = start_backend(garbled);
    let err = api.get_all_orders().await.expect_err("Expected a decoding error");
    assert!(matches!(err, MarketplaceApiError::JsonError(_)), "got {err:?}");
    handle.stop(true).await;
}

#[actix_web::test]
async fn unreachable_backend_is_a_transport_error() {
    let _ = env_logger::try_init();
    let addr = {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        listener.local_addr().unwrap()
    };
    let api = MarketplaceApi::new(MarketplaceConfig::new(&format!("http://{addr}"))).unwrap();
    let err = api.get_all_orders().await.expect_err("Expected a transport error");
    assert!(matches!(err, MarketplaceApiError::Transport(_)), "got {err:?}");
}
