use statebind_demo::{create_store, BasketHelper, BasketItem};

async fn filled_basket() -> BasketHelper {
    let helper = BasketHelper::new(create_store().unwrap()).unwrap();
    helper.add_item(BasketItem::new(1, "foo", 10)).await.unwrap();
    helper.add_item(BasketItem::new(2, "bar", 20)).await.unwrap();
    helper.add_item(BasketItem::new(3, "foobar", 30)).await.unwrap();
    helper
}

fn ids(items: &[BasketItem]) -> Vec<u32> {
    items.iter().map(|item| item.id).collect()
}

#[tokio::test]
async fn test_new_basket_is_empty() {
    let helper = BasketHelper::new(create_store().unwrap()).unwrap();

    assert!(helper.is_empty().unwrap());
    assert!(helper.items().unwrap().is_empty());
    assert_eq!(helper.amount().unwrap(), 0);
}

#[tokio::test]
async fn test_basket_scenario() {
    let helper = filled_basket().await;

    assert!(!helper.is_empty().unwrap());
    assert_eq!(ids(&helper.items().unwrap()), vec![1, 2, 3]);
    assert_eq!(helper.amount().unwrap(), 60);

    helper.add_item(BasketItem::new(4, "new", 40)).await.unwrap();
    assert_eq!(helper.items().unwrap().len(), 4);
    assert_eq!(helper.amount().unwrap(), 100);

    let second = helper.items().unwrap()[1].clone();
    helper.remove_item(second).await.unwrap();
    assert_eq!(ids(&helper.items().unwrap()), vec![1, 3, 4]);

    helper.clear_basket().await.unwrap();
    assert_eq!(helper.items().unwrap().len(), 0);
    assert!(helper.is_empty().unwrap());
}

#[tokio::test]
async fn test_remove_item_takes_first_match_only() {
    let helper = BasketHelper::new(create_store().unwrap()).unwrap();
    let twin = BasketItem::new(7, "twin", 5);
    helper.add_item(twin.clone()).await.unwrap();
    helper.add_item(BasketItem::new(8, "other", 1)).await.unwrap();
    helper.add_item(twin.clone()).await.unwrap();

    helper.remove_item(twin).await.unwrap();

    assert_eq!(ids(&helper.items().unwrap()), vec![8, 7]);
}

#[tokio::test]
async fn test_remove_missing_item_is_a_no_op() {
    let helper = filled_basket().await;

    helper
        .remove_item(BasketItem::new(99, "missing", 1))
        .await
        .unwrap();

    assert_eq!(ids(&helper.items().unwrap()), vec![1, 2, 3]);
}

#[tokio::test]
async fn test_stores_do_not_share_state() {
    let first = filled_basket().await;
    let second = BasketHelper::new(create_store().unwrap()).unwrap();

    assert_eq!(first.amount().unwrap(), 60);
    assert!(second.is_empty().unwrap());
}

#[tokio::test]
async fn test_concurrent_adds_both_land() {
    let helper = BasketHelper::new(create_store().unwrap()).unwrap();

    let (a, b) = tokio::join!(
        helper.add_item(BasketItem::new(1, "foo", 10)),
        helper.add_item(BasketItem::new(2, "bar", 20)),
    );
    a.unwrap();
    b.unwrap();

    assert_eq!(helper.amount().unwrap(), 30);
}

#[tokio::test]
async fn test_amount_saturates_instead_of_overflowing() {
    let helper = BasketHelper::new(create_store().unwrap()).unwrap();
    helper
        .add_item(BasketItem::new(1, "gold", u32::MAX))
        .await
        .unwrap();
    helper.add_item(BasketItem::new(2, "silver", 5)).await.unwrap();

    assert_eq!(helper.amount().unwrap(), u32::MAX);
}
