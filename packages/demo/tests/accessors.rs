use std::sync::{Arc, Mutex};

use statebind_core::{
    AccessorWrapper, Error, Getter, HandlerKind, Mutation, NoPayload, Result, WrapperConfig,
};
use statebind_demo::store::{BasketState, RootState};
use statebind_demo::{create_store, BasketHelper, BasketItem, BASKET, ROOT};
use statebind_memory::MemoryStore;

fn basket_wrapper() -> AccessorWrapper<BasketState, RootState> {
    AccessorWrapper::new("basket")
}

#[test]
fn test_keys_follow_namespace_and_name() {
    let _store = create_store().unwrap();
    let basket = basket_wrapper();
    let root: AccessorWrapper<RootState, RootState> = AccessorWrapper::root();

    assert_eq!(basket.read(&BASKET.amount).unwrap().key().as_str(), "basket/amount");
    assert_eq!(
        basket.commit(&BASKET.push_item).unwrap().key().as_str(),
        "basket/PUSH_ITEM"
    );
    assert_eq!(
        basket.dispatch(&BASKET.clear_basket).unwrap().key().as_str(),
        "basket/clearBasket"
    );
    assert_eq!(root.read(&ROOT.language).unwrap().key().as_str(), "language");
    assert_eq!(
        root.dispatch(&ROOT.change_language).unwrap().key().as_str(),
        "changeLanguage"
    );
}

#[test]
fn test_second_commit_replaces_first() {
    let store = create_store().unwrap();
    let set_items = basket_wrapper().commit(&BASKET.set_items).unwrap();
    let items = basket_wrapper().read(&BASKET.items).unwrap();

    set_items
        .commit_with(&store, vec![BasketItem::new(1, "foo", 10)])
        .unwrap();
    set_items
        .commit_with(&store, vec![BasketItem::new(2, "bar", 20)])
        .unwrap();

    assert_eq!(items.read(&store).unwrap(), vec![BasketItem::new(2, "bar", 20)]);
}

#[test]
fn test_commit_is_visible_to_subscribers_before_returning() {
    let store = create_store().unwrap();
    let seen = Arc::new(Mutex::new(Vec::new()));
    let sink = seen.clone();
    store.subscribe(move |record| sink.lock().unwrap().push(record.key.clone()));

    let push = basket_wrapper().commit(&BASKET.push_item).unwrap();
    push.commit_with(&store, BasketItem::new(1, "foo", 10)).unwrap();

    assert_eq!(*seen.lock().unwrap(), vec!["basket/PUSH_ITEM"]);
}

#[tokio::test]
async fn test_read_through_action_context_matches_store() {
    let amount = BASKET.amount.clone();
    let mut basket = BASKET.descriptor();
    let probe = basket.action_no_payload("probeAmount", move |ctx| {
        let amount = amount.clone();
        async move { basket_wrapper().read(&amount)?.read(&ctx) }
    });
    let mut root = ROOT.descriptor();
    root.module("basket", basket);
    let store = MemoryStore::new(root).unwrap();

    let helper = BasketHelper::new(store.clone()).unwrap();
    helper.add_item(BasketItem::new(1, "foo", 10)).await.unwrap();
    helper.add_item(BasketItem::new(2, "bar", 25)).await.unwrap();

    let from_context: u32 = basket_wrapper()
        .dispatch(&probe)
        .unwrap()
        .dispatch(&store)
        .await
        .unwrap();

    assert_eq!(from_context, helper.amount().unwrap());
    assert_eq!(from_context, 35);
}

#[tokio::test]
async fn test_action_context_can_call_other_modules() {
    let set_language = ROOT.set_language.clone();
    let mut basket = BASKET.descriptor();
    let localize = basket.action("localize", move |ctx, language: String| {
        let set_language = set_language.clone();
        async move {
            let root: AccessorWrapper<RootState, RootState> = AccessorWrapper::root();
            root.commit(&set_language)?.commit_with(&ctx, language)?;
            ctx.getter::<bool>("isEmpty")
        }
    });
    let mut root = ROOT.descriptor();
    root.module("basket", basket);
    let store = MemoryStore::new(root).unwrap();

    let was_empty: bool = basket_wrapper()
        .dispatch(&localize)
        .unwrap()
        .dispatch_with(&store, "es".to_string())
        .await
        .unwrap();

    let language = AccessorWrapper::<RootState, RootState>::root()
        .read(&ROOT.language)
        .unwrap()
        .read(&store)
        .unwrap();
    assert!(was_empty);
    assert_eq!(language, "es");
}

#[tokio::test]
async fn test_untagged_handlers_fail_in_the_container() {
    let store = create_store().unwrap();
    let wrapper = basket_wrapper();
    let count: Getter<BasketState, RootState, usize> =
        Getter::new(|state: &BasketState, _: &RootState| state.items.len());
    let clear: Mutation<BasketState, NoPayload> =
        Mutation::no_payload(|state: &mut BasketState| state.items.clear());

    let read = wrapper.read(&count).unwrap();
    let commit = wrapper.commit(&clear).unwrap();
    assert!(read.key().is_empty());
    assert!(commit.key().is_empty());

    assert!(matches!(
        read.read(&store),
        Err(Error::UnknownKey { kind: HandlerKind::Getter, key }) if key.is_empty()
    ));
    assert!(matches!(
        commit.commit(&store),
        Err(Error::UnknownKey { kind: HandlerKind::Mutation, key }) if key.is_empty()
    ));
}

#[test]
fn test_strict_wrapper_rejects_untagged_handlers() {
    let wrapper: AccessorWrapper<BasketState, RootState> =
        AccessorWrapper::with_config("basket", WrapperConfig::strict());
    let count: Getter<BasketState, RootState, usize> =
        Getter::new(|state: &BasketState, _: &RootState| state.items.len());

    let err = wrapper.read(&count).unwrap_err();

    assert!(matches!(
        err,
        Error::UntaggedHandler {
            kind: HandlerKind::Getter
        }
    ));
}

#[test]
fn test_strict_wrapper_accepts_registered_handlers() -> Result<()> {
    let store = create_store()?;
    let wrapper: AccessorWrapper<BasketState, RootState> =
        AccessorWrapper::with_config("basket", WrapperConfig::strict());

    assert!(wrapper.read(&BASKET.is_empty)?.read(&store)?);
    Ok(())
}
