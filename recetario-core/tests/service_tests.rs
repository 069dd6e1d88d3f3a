//! Behaviour of the recipe service against the in-memory store and fake uploader.

use recetario_core::{
    CreateOutcome, CreatedRecipe, DeleteOutcome, EditOutcome, FakeUploader, MemoryStore,
    PendingImage, RecipeDraft, RecipeService, ServiceError, StoreError, UploadError,
    ValidationError,
};
use serde_json::json;
use std::sync::Arc;
use uuid::Uuid;

const DEFAULT_IMAGE: &str = "/uploads/default.png";
const PNG: &[u8] = b"\x89PNG\r\n\x1a\n\0\0\0\rIHDR";
const GIF: &[u8] = b"GIF89a\x01\0\x01\0";

struct Harness {
    store: Arc<MemoryStore>,
    uploader: Arc<FakeUploader>,
    service: RecipeService,
}

fn harness() -> Harness {
    harness_with(FakeUploader::new("mem://img"))
}

fn harness_with(uploader: FakeUploader) -> Harness {
    let store = Arc::new(MemoryStore::new());
    let uploader = Arc::new(uploader);
    let service = RecipeService::new(store.clone(), uploader.clone(), DEFAULT_IMAGE);
    Harness {
        store,
        uploader,
        service,
    }
}

fn tortilla() -> RecipeDraft {
    RecipeDraft {
        title: Some(json!("Tortilla")),
        ingredients: Some(json!("eggs, potato")),
        preparation: Some(json!("fry")),
        category: Some(json!("main")),
    }
}

fn png() -> Option<PendingImage> {
    Some(PendingImage::new(PNG.to_vec(), Some("photo.png".to_string())))
}

async fn created(h: &Harness, draft: RecipeDraft, owner: Option<&str>) -> CreatedRecipe {
    match h.service.create(draft, None, owner).await.unwrap() {
        CreateOutcome::Created(created) => created,
        other => panic!("expected Created, got {:?}", other),
    }
}

#[tokio::test]
async fn test_create_then_list_scoped_by_owner() {
    let h = harness();

    let created = created(&h, tortilla(), Some("u1")).await;
    assert_eq!(created.image, DEFAULT_IMAGE);

    let mine = h.service.list(Some("u1")).await.unwrap();
    assert_eq!(mine.len(), 1);
    assert_eq!(mine[0].id, created.id);
    assert_eq!(mine[0].title, "Tortilla");
    assert_eq!(mine[0].ingredients, Some(json!("eggs, potato")));
    assert_eq!(mine[0].preparation, Some(json!("fry")));
    assert_eq!(mine[0].category, Some(json!("main")));

    assert!(h.service.list(Some("u2")).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_scoped_list_excludes_other_owners_and_ownerless_records() {
    let h = harness();
    created(&h, RecipeDraft::titled("mine"), Some("a")).await;
    created(&h, RecipeDraft::titled("theirs"), Some("b")).await;
    created(&h, RecipeDraft::titled("nobody's"), None).await;

    let mine = h.service.list(Some("a")).await.unwrap();
    assert_eq!(mine.len(), 1);
    assert_eq!(mine[0].owner_id.as_deref(), Some("a"));

    let all = h.service.list(None).await.unwrap();
    assert_eq!(all.len(), 3);
}

#[tokio::test]
async fn test_blank_title_create_makes_no_store_calls() {
    let h = harness();

    for title in [json!("   "), json!(""), json!("\t\n"), json!(null)] {
        let draft = RecipeDraft {
            title: Some(title),
            ..tortilla()
        };
        let outcome = h.service.create(draft, png(), Some("u1")).await.unwrap();
        assert!(matches!(outcome, CreateOutcome::Rejected(_)));
    }

    let missing = RecipeDraft {
        title: None,
        ..tortilla()
    };
    assert_eq!(
        h.service.create(missing, None, None).await.unwrap(),
        CreateOutcome::Rejected(ValidationError::MissingTitle)
    );

    assert_eq!(h.store.calls(), 0);
    assert_eq!(h.uploader.uploads(), 0);
    assert!(h.store.is_empty());
}

#[tokio::test]
async fn test_create_uses_upload_reference_when_present() {
    let h = harness();

    let outcome = h.service.create(tortilla(), png(), None).await.unwrap();
    let CreateOutcome::Created(created) = outcome else {
        panic!("expected Created");
    };

    assert_eq!(created.image, "mem://img/1.png");
    assert_eq!(h.store.get(created.id).unwrap().image, "mem://img/1.png");
}

#[tokio::test]
async fn test_create_coerces_non_text_title() {
    let h = harness();
    let draft = RecipeDraft {
        title: Some(json!(1990)),
        ..RecipeDraft::default()
    };

    let created = created(&h, draft, None).await;
    let stored = h.store.get(created.id).unwrap();
    assert_eq!(stored.title, "1990");
    assert_eq!(stored.ingredients, None);
}

#[tokio::test]
async fn test_create_fails_whole_operation_on_upload_error() {
    let h = harness_with(FakeUploader::failing("bucket offline"));

    let result = h.service.create(tortilla(), png(), Some("u1")).await;
    assert!(matches!(
        result,
        Err(ServiceError::Upload(UploadError::Storage(_)))
    ));
    assert!(h.store.is_empty());
}

#[tokio::test]
async fn test_create_rejects_disallowed_format() {
    let h = harness();
    let gif = Some(PendingImage::new(GIF.to_vec(), None));

    let result = h.service.create(tortilla(), gif, None).await;
    assert!(matches!(
        result,
        Err(ServiceError::Upload(UploadError::UnsupportedFormat(_)))
    ));
    assert_eq!(h.store.calls(), 0);
}

#[tokio::test]
async fn test_edit_without_image_keeps_stored_image() {
    let h = harness();
    let created = created(&h, tortilla(), Some("u1")).await;

    let outcome = h
        .service
        .edit(
            created.id,
            RecipeDraft::titled("Tortilla española"),
            None,
            None,
        )
        .await
        .unwrap();
    assert_eq!(
        outcome,
        EditOutcome::Updated(recetario_core::EditedRecipe { image: None })
    );

    let stored = h.store.get(created.id).unwrap();
    assert_eq!(stored.title, "Tortilla española");
    assert_eq!(stored.image, DEFAULT_IMAGE);
    assert_eq!(stored.owner_id.as_deref(), Some("u1"));
    // absent fields are left as they were
    assert_eq!(stored.ingredients, Some(json!("eggs, potato")));
}

#[tokio::test]
async fn test_edit_upload_wins_over_prior_image() {
    let h = harness();
    let created = created(&h, tortilla(), None).await;

    let outcome = h
        .service
        .edit(
            created.id,
            tortilla(),
            png(),
            Some("https://cdn.example/old.png".to_string()),
        )
        .await
        .unwrap();

    let EditOutcome::Updated(edited) = outcome else {
        panic!("expected Updated");
    };
    assert_eq!(edited.image.as_deref(), Some("mem://img/1.png"));
    assert_eq!(h.store.get(created.id).unwrap().image, "mem://img/1.png");
}

#[tokio::test]
async fn test_edit_prior_image_is_stored_when_no_upload() {
    let h = harness();
    let created = created(&h, tortilla(), None).await;

    h.service
        .edit(
            created.id,
            tortilla(),
            None,
            Some("https://cdn.example/kept.png".to_string()),
        )
        .await
        .unwrap();
    assert_eq!(
        h.store.get(created.id).unwrap().image,
        "https://cdn.example/kept.png"
    );

    // a blank prior image is ignored
    h.service
        .edit(created.id, tortilla(), None, Some("  ".to_string()))
        .await
        .unwrap();
    assert_eq!(
        h.store.get(created.id).unwrap().image,
        "https://cdn.example/kept.png"
    );
}

#[tokio::test]
async fn test_edit_null_field_clears_it() {
    let h = harness();
    let created = created(&h, tortilla(), None).await;

    let draft = RecipeDraft {
        category: Some(serde_json::Value::Null),
        ..RecipeDraft::titled("Tortilla")
    };
    h.service.edit(created.id, draft, None, None).await.unwrap();

    let stored = h.store.get(created.id).unwrap();
    assert_eq!(stored.category, None);
    assert_eq!(stored.preparation, Some(json!("fry")));
}

#[tokio::test]
async fn test_edit_missing_or_blank_title_is_rejected() {
    let h = harness();
    let created = created(&h, tortilla(), None).await;
    let calls_before = h.store.calls();

    let absent = RecipeDraft {
        title: None,
        ..tortilla()
    };
    assert_eq!(
        h.service.edit(created.id, absent, png(), None).await.unwrap(),
        EditOutcome::Rejected(ValidationError::MissingTitle)
    );
    assert_eq!(
        h.service
            .edit(created.id, RecipeDraft::titled(" "), None, None)
            .await
            .unwrap(),
        EditOutcome::Rejected(ValidationError::BlankTitle)
    );

    assert_eq!(h.store.calls(), calls_before);
    assert_eq!(h.uploader.uploads(), 0);
    assert_eq!(h.store.get(created.id).unwrap().title, "Tortilla");
}

#[tokio::test]
async fn test_edit_unknown_id_is_not_found() {
    let h = harness();

    let outcome = h
        .service
        .edit(Uuid::new_v4(), RecipeDraft::titled("X"), None, None)
        .await
        .unwrap();

    assert_eq!(outcome, EditOutcome::NotFound);
    assert!(h.store.is_empty());
}

#[tokio::test]
async fn test_delete_is_idempotent_in_effect() {
    let h = harness();
    let keep = created(&h, RecipeDraft::titled("keep"), None).await;
    let doomed = created(&h, RecipeDraft::titled("doomed"), None).await;

    assert_eq!(
        h.service.delete(Uuid::new_v4()).await.unwrap(),
        DeleteOutcome::NotFound
    );
    assert_eq!(h.store.len(), 2);

    assert_eq!(
        h.service.delete(doomed.id).await.unwrap(),
        DeleteOutcome::Deleted
    );
    assert_eq!(h.store.len(), 1);
    assert_eq!(
        h.service.delete(doomed.id).await.unwrap(),
        DeleteOutcome::NotFound
    );
    assert!(h.store.get(keep.id).is_some());
}

#[tokio::test]
async fn test_storage_failures_surface_as_storage_errors() {
    let h = harness();
    h.store.set_unavailable(true);

    assert!(matches!(
        h.service.list(None).await,
        Err(ServiceError::Storage(StoreError::Unavailable(_)))
    ));
    assert!(matches!(
        h.service.create(tortilla(), None, None).await,
        Err(ServiceError::Storage(_))
    ));
    assert!(matches!(
        h.service.delete(Uuid::new_v4()).await,
        Err(ServiceError::Storage(_))
    ));
}

#[tokio::test]
async fn test_edit_unknown_id_discards_new_upload() {
    let h = harness();

    let outcome = h
        .service
        .edit(Uuid::new_v4(), RecipeDraft::titled("X"), png(), None)
        .await
        .unwrap();

    assert_eq!(outcome, EditOutcome::NotFound);
    assert_eq!(h.uploader.uploads(), 1);
    assert_eq!(h.uploader.stored(), 0);
}

#[tokio::test]
async fn test_store_failure_discards_new_upload() {
    let h = harness();
    let created = created(&h, tortilla(), None).await;
    h.store.set_unavailable(true);

    let result = h.service.create(tortilla(), png(), None).await;
    assert!(matches!(result, Err(ServiceError::Storage(_))));

    let result = h.service.edit(created.id, tortilla(), png(), None).await;
    assert!(matches!(result, Err(ServiceError::Storage(_))));

    assert_eq!(h.uploader.uploads(), 2);
    assert_eq!(h.uploader.stored(), 0);
}

#[tokio::test]
async fn test_kept_uploads_are_not_discarded() {
    let h = harness();
    let created = created(&h, tortilla(), None).await;

    h.service.create(tortilla(), png(), None).await.unwrap();
    h.service
        .edit(created.id, tortilla(), png(), None)
        .await
        .unwrap();
    // a store failure must not touch the default or a prior image
    h.store.set_unavailable(true);
    let _ = h
        .service
        .edit(created.id, tortilla(), None, Some("mem://img/1.png".to_string()))
        .await;

    assert_eq!(h.uploader.discarded(), 0);
    assert_eq!(h.uploader.stored(), 2);
}
