mod support;

use locklist_core::{
    DeletePolicy, ItemPatch, MemoryKeyValueStore, SecureKeyValueStore, TodoConfig, TodoId,
    TodoServiceError, TodoValidationError, DEFAULT_STORAGE_KEY,
};
use std::sync::atomic::Ordering;
use std::sync::Arc;
use support::{app_with, loaded_app, titles, FailingKeyValueStore, ScriptedAuthenticator};

#[tokio::test]
async fn buy_milk_scenario() {
    let device = ScriptedAuthenticator::accepting();
    let (app, _kv) = loaded_app(device.clone()).await;
    assert!(app.list.items().await.is_empty());
    assert!(!app.session.is_authenticated());

    let milk = app.list.add_item("Buy milk").await.expect("add milk");
    assert_eq!(device.prompt_count(), 1);
    assert!(app.session.is_authenticated());
    assert_eq!(milk.title, "Buy milk");
    assert!(!milk.completed);

    let eggs = app.list.add_item("Buy eggs").await.expect("add eggs");
    assert_eq!(device.prompt_count(), 1, "unlocked session must not re-prompt");
    assert_eq!(titles(&app.list.items().await), vec!["Buy eggs", "Buy milk"]);

    let updated = app
        .list
        .update_item(&milk.id, &ItemPatch::completed(true))
        .await
        .expect("update milk")
        .expect("milk exists");
    assert!(updated.completed);
    assert_eq!(updated.title, "Buy milk");
    assert_eq!(updated.created_at, milk.created_at);

    assert!(app.list.delete_item(&eggs.id).await.expect("delete eggs"));
    assert_eq!(titles(&app.list.items().await), vec!["Buy milk"]);

    let before = app.list.items().await;
    let removed = app
        .list
        .delete_item(&TodoId::from("nonexistent"))
        .await
        .expect("deleting an unknown id is not an error");
    assert!(!removed);
    assert_eq!(app.list.items().await, before);
    assert_eq!(device.prompt_count(), 1);
}

#[tokio::test]
async fn blank_titles_never_prompt_or_mutate() {
    let device = ScriptedAuthenticator::accepting();
    let (app, _kv) = loaded_app(device.clone()).await;

    for blank in ["", "   ", "\t\n"] {
        let err = app.list.add_item(blank).await.expect_err("blank title");
        assert_eq!(
            err,
            TodoServiceError::Validation(TodoValidationError::EmptyTitle)
        );
    }

    assert_eq!(device.prompt_count(), 0);
    assert!(app.list.items().await.is_empty());
    assert!(!app.session.is_authenticated());
}

#[tokio::test]
async fn blank_title_update_is_rejected_before_auth() {
    let device = ScriptedAuthenticator::accepting();
    let (app, _kv) = loaded_app(device.clone()).await;
    let item = app.list.add_item("Buy milk").await.expect("add");
    app.session.lock();

    let err = app
        .list
        .update_item(&item.id, &ItemPatch::title("  "))
        .await
        .expect_err("blank title");
    assert!(matches!(err, TodoServiceError::Validation(_)));
    assert_eq!(device.prompt_count(), 1);
    assert_eq!(app.list.get_item(&item.id).await, Some(item));
}

#[tokio::test]
async fn titles_are_stored_trimmed() {
    let (app, _kv) = loaded_app(ScriptedAuthenticator::accepting()).await;
    let item = app.list.add_item("  Buy milk  ").await.expect("add");
    assert_eq!(item.title, "Buy milk");

    let renamed = app
        .list
        .update_item(&item.id, &ItemPatch::title(" Buy oat milk "))
        .await
        .expect("update")
        .expect("exists");
    assert_eq!(renamed.title, "Buy oat milk");
}

#[tokio::test]
async fn denied_add_changes_nothing() {
    let device = ScriptedAuthenticator::declining();
    let (app, _kv) = loaded_app(device.clone()).await;

    let err = app.list.add_item("Buy milk").await.expect_err("denied");
    assert_eq!(err, TodoServiceError::NotAuthenticated);
    assert!(app.list.items().await.is_empty());
    assert_eq!(device.prompt_count(), 1);
}

#[tokio::test]
async fn denied_delete_leaves_collection_identical() {
    let device = ScriptedAuthenticator::accepting();
    let (app, _kv) = loaded_app(device.clone()).await;
    let milk = app.list.add_item("Buy milk").await.expect("add milk");
    app.list.add_item("Buy eggs").await.expect("add eggs");
    app.session.lock();
    device.set_default_answer(false);

    let before = app.list.items().await;
    let err = app.list.delete_item(&milk.id).await.expect_err("denied");
    assert_eq!(err, TodoServiceError::NotAuthenticated);
    assert_eq!(app.list.items().await, before);
}

#[tokio::test]
async fn update_merges_only_present_fields_and_ignores_unknown_ids() {
    let (app, _kv) = loaded_app(ScriptedAuthenticator::accepting()).await;
    let item = app.list.add_item("Buy milk").await.expect("add");

    let renamed = app
        .list
        .update_item(&item.id, &ItemPatch::title("Buy oat milk"))
        .await
        .expect("update")
        .expect("exists");
    assert!(!renamed.completed);
    assert_eq!(renamed.id, item.id);

    let missing = app
        .list
        .update_item(&TodoId::from("missing"), &ItemPatch::completed(true))
        .await
        .expect("unknown id is not an error");
    assert!(missing.is_none());
    assert_eq!(app.list.items().await, vec![renamed]);
}

#[tokio::test]
async fn empty_patch_is_a_no_op_without_prompt() {
    let device = ScriptedAuthenticator::accepting();
    let (app, _kv) = loaded_app(device.clone()).await;
    let item = app.list.add_item("Buy milk").await.expect("add");
    app.session.lock();

    let unchanged = app
        .list
        .update_item(&item.id, &ItemPatch::default())
        .await
        .expect("empty patch");
    assert_eq!(unchanged, Some(item));
    assert_eq!(device.prompt_count(), 1);
}

#[tokio::test]
async fn mutations_wait_for_initial_load() {
    let device = ScriptedAuthenticator::accepting();
    let app = app_with(
        Arc::new(MemoryKeyValueStore::new()),
        device.clone(),
        TodoConfig::default(),
    );
    assert!(!app.list.is_loaded().await);

    let err = app.list.add_item("Buy milk").await.expect_err("not loaded");
    assert_eq!(err, TodoServiceError::NotLoaded);
    assert_eq!(device.prompt_count(), 0);

    assert!(app.list.load().await.is_empty());
    assert!(app.list.is_loaded().await);
    app.list.add_item("Buy milk").await.expect("add after load");
}

#[tokio::test]
async fn persistence_failure_does_not_block_mutations() {
    let kv = Arc::new(FailingKeyValueStore::default());
    let app = app_with(kv.clone(), ScriptedAuthenticator::accepting(), TodoConfig::default());

    assert!(app.list.load().await.is_empty(), "read failure loads empty");
    let milk = app.list.add_item("Buy milk").await.expect("add");
    app.list
        .update_item(&milk.id, &ItemPatch::completed(true))
        .await
        .expect("update");
    let eggs = app.list.add_item("Buy eggs").await.expect("add");
    assert!(app.list.delete_item(&eggs.id).await.expect("delete"));
    app.list.flush().await;

    let items = app.list.items().await;
    assert_eq!(titles(&items), vec!["Buy milk"]);
    assert!(items[0].completed);
    assert!(kv.writes.load(Ordering::SeqCst) >= 1);
}

#[tokio::test]
async fn every_mutation_persists_the_full_snapshot() {
    let (app, kv) = loaded_app(ScriptedAuthenticator::accepting()).await;
    let milk = app.list.add_item("Buy milk").await.expect("add");
    app.list.add_item("Buy eggs").await.expect("add");
    app.list
        .update_item(&milk.id, &ItemPatch::completed(true))
        .await
        .expect("update");
    app.list.flush().await;

    let raw = kv
        .get(DEFAULT_STORAGE_KEY)
        .await
        .expect("read")
        .expect("snapshot written");
    let persisted: Vec<locklist_core::TodoItem> = serde_json::from_str(&raw).expect("decode");
    assert_eq!(persisted, app.list.items().await);
}

#[tokio::test]
async fn always_prompt_policy_reprompts_on_every_delete() {
    let device = ScriptedAuthenticator::accepting();
    let config = TodoConfig {
        delete_policy: DeletePolicy::AlwaysPrompt,
        ..TodoConfig::default()
    };
    let app = app_with(Arc::new(MemoryKeyValueStore::new()), device.clone(), config);
    app.list.load().await;

    let milk = app.list.add_item("Buy milk").await.expect("add");
    let eggs = app.list.add_item("Buy eggs").await.expect("add");
    assert_eq!(device.prompt_count(), 1);

    app.list.delete_item(&milk.id).await.expect("delete milk");
    app.list.delete_item(&eggs.id).await.expect("delete eggs");
    assert_eq!(device.prompt_count(), 3);
    assert_eq!(
        device.messages().last().map(String::as_str),
        Some("Authenticate to delete TODO")
    );

    let item = app.list.add_item("Buy bread").await.expect("add");
    device.set_default_answer(false);
    let err = app.list.delete_item(&item.id).await.expect_err("denied");
    assert_eq!(err, TodoServiceError::NotAuthenticated);
    assert_eq!(app.list.items().await, vec![item]);
}

#[tokio::test]
async fn session_cached_delete_uses_unlocked_session() {
    let device = ScriptedAuthenticator::accepting();
    let (app, _kv) = loaded_app(device.clone()).await;
    let milk = app.list.add_item("Buy milk").await.expect("add");

    app.list.delete_item(&milk.id).await.expect("delete");
    assert_eq!(device.prompt_count(), 1);
}

#[tokio::test]
async fn delete_while_locked_prompts_with_delete_message() {
    let device = ScriptedAuthenticator::accepting();
    let (app, _kv) = loaded_app(device.clone()).await;
    let milk = app.list.add_item("Buy milk").await.expect("add");
    app.session.lock();

    assert!(app.list.delete_item(&milk.id).await.expect("delete"));
    assert_eq!(
        device.messages(),
        vec!["Authenticate to add TODO", "Authenticate to delete TODO"]
    );
    assert!(app.session.is_authenticated());
}

#[tokio::test]
async fn clear_all_empties_memory_and_store() {
    let (app, kv) = loaded_app(ScriptedAuthenticator::accepting()).await;
    app.list.add_item("Buy milk").await.expect("add");
    app.list.add_item("Buy eggs").await.expect("add");

    assert_eq!(app.list.clear_all().await.expect("clear"), 2);
    app.list.flush().await;

    assert!(app.list.items().await.is_empty());
    assert_eq!(kv.get(DEFAULT_STORAGE_KEY).await.expect("read"), None);
}

#[tokio::test]
async fn load_is_one_shot() {
    let kv = Arc::new(MemoryKeyValueStore::new());
    let app = app_with(kv.clone(), ScriptedAuthenticator::accepting(), TodoConfig::default());
    app.list.load().await;
    app.list.add_item("Buy milk").await.expect("add");

    kv.delete(DEFAULT_STORAGE_KEY).await.expect("wipe store");
    let items = app.list.load().await;
    assert_eq!(titles(&items), vec!["Buy milk"]);
}
