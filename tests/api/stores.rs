use claim::{assert_err, assert_matches, assert_ok_eq};
use marketplace::{
    db_interaction::{append_order, decrement_product_stock, list_orders_by_buyer, NewOrder, StockDecrementError},
    domain::{capabilities::Capabilities, quantity::Quantity}
};

use crate::helpers::TestApp;

#[actix_web::test]
async fn decrement_reports_new_stock_and_refuses_to_go_negative(){
    let app = TestApp::spawn_app().await;
    let seller = app.seed_user(Capabilities::default());
    let product = app.seed_product(seller.id, "1", 3);

    let two = Quantity::parse(2).unwrap();
    assert_ok_eq!(decrement_product_stock(app.pool.get().unwrap(), product.id, two).await, 1);

    let res = decrement_product_stock(app.pool.get().unwrap(), product.id, two).await;
    assert_matches!(res, Err(StockDecrementError::InsufficientStock{ available: 1 }));
    assert_eq!(app.stock_of(product.id), 1);

    let one = Quantity::parse(1).unwrap();
    let res = decrement_product_stock(app.pool.get().unwrap(), 31_337, one).await;
    assert_matches!(res, Err(StockDecrementError::NotFound(31_337)));
}

#[actix_web::test]
async fn decrement_never_raises_or_keeps_stock(){
    let app = TestApp::spawn_app().await;
    let seller = app.seed_user(Capabilities::default());
    let product = app.seed_product(seller.id, "1", 3);

    // Zero and negative amounts cannot be expressed as a decrement
    assert_err!(Quantity::parse(-5));
    assert_err!(Quantity::parse(0));

    let smallest = Quantity::parse(1).unwrap();
    assert_ok_eq!(decrement_product_stock(app.pool.get().unwrap(), product.id, smallest).await, 2);
    assert_eq!(app.stock_of(product.id), 2);
}

#[actix_web::test]
async fn appended_orders_get_ids_and_timestamps(){
    let app = TestApp::spawn_app().await;
    let seller = app.seed_user(Capabilities::default());
    let buyer = app.seed_user(Capabilities::default());
    let product = app.seed_product(seller.id, "4", 10);

    let new_order = NewOrder{
        product_id: product.id,
        buyer_id: buyer.id,
        seller_id: seller.id,
        quantity: 2,
        total_price: 8.0
    };

    let first = append_order(app.pool.get().unwrap(), new_order.clone()).await.unwrap();
    let second = append_order(app.pool.get().unwrap(), new_order).await.unwrap();

    assert!(second.id > first.id);
    assert!(second.created_at >= first.created_at);

    let listed = list_orders_by_buyer(app.pool.get().unwrap(), buyer.id).await.unwrap();
    assert_eq!(listed, vec![second, first]);
}
