use marketplace::{
    db_interaction::{list_orders_by_buyer, list_orders_by_seller},
    domain::capabilities::Capabilities,
    routes::OrdersResponse
};

use crate::helpers::TestApp;

#[actix_web::test]
async fn purchases_and_sales_are_filtered_and_newest_first(){
    let app = TestApp::spawn_app().await;
    let seller = app.seed_user(Capabilities::default());
    let other_seller = app.seed_user(Capabilities::default());
    let alice = app.seed_user(Capabilities::default());
    let bob = app.seed_user(Capabilities::default());

    let lamp = app.seed_product(seller.id, "10", 10);
    let chair = app.seed_product(other_seller.id, "40", 10);

    for (buyer, product_id, quantity) in [
        (&alice, lamp.id, 1),
        (&bob, lamp.id, 2),
        (&alice, chair.id, 1),
        (&alice, lamp.id, 3),
    ] {
        let response = app.purchase(&buyer.token, product_id, quantity).await;
        assert_eq!(response.status().as_u16(), 200);
    }

    let purchases: OrdersResponse = app.get_authed("/purchases", &alice.token).await.json().await.unwrap();
    let quantities: Vec<i32> = purchases.orders.iter().map(|o| o.quantity).collect();
    assert_eq!(quantities, vec![3, 1, 1]);
    assert!(purchases.orders.iter().all(|o| o.buyer_id == alice.id));
    assert!(purchases.orders.windows(2).all(|w| w[0].created_at >= w[1].created_at));

    let sales: OrdersResponse = app.get_authed("/sales", &seller.token).await.json().await.unwrap();
    let quantities: Vec<i32> = sales.orders.iter().map(|o| o.quantity).collect();
    assert_eq!(quantities, vec![3, 2, 1]);
    assert!(sales.orders.iter().all(|o| o.seller_id == seller.id && o.product_id == lamp.id));

    let other_sales: OrdersResponse = app.get_authed("/sales", &other_seller.token).await.json().await.unwrap();
    assert_eq!(other_sales.orders.len(), 1);
    assert_eq!(other_sales.orders[0].total_price, 40.0);
}

#[actix_web::test]
async fn ledger_queries_match_exact_party(){
    let app = TestApp::spawn_app().await;
    let seller = app.seed_user(Capabilities::default());
    let buyer = app.seed_user(Capabilities::default());
    let product = app.seed_product(seller.id, "5", 3);

    assert_eq!(app.purchase(&buyer.token, product.id, 1).await.status().as_u16(), 200);

    let as_buyer = list_orders_by_buyer(app.pool.get().unwrap(), buyer.id).await.unwrap();
    let as_seller = list_orders_by_buyer(app.pool.get().unwrap(), seller.id).await.unwrap();
    let sold = list_orders_by_seller(app.pool.get().unwrap(), seller.id).await.unwrap();
    let not_sold = list_orders_by_seller(app.pool.get().unwrap(), buyer.id).await.unwrap();

    assert_eq!(as_buyer.len(), 1);
    assert!(as_seller.is_empty());
    assert_eq!(sold, as_buyer);
    assert!(not_sold.is_empty());
}

#[actix_web::test]
async fn empty_history_is_an_empty_list(){
    let app = TestApp::spawn_app().await;
    let user = app.seed_user(Capabilities::default());

    let response = app.get_authed("/purchases", &user.token).await;
    assert_eq!(response.status().as_u16(), 200);

    let body: OrdersResponse = response.json().await.unwrap();
    assert!(body.orders.is_empty());
}
