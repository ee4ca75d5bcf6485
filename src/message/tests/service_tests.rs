//! Unit tests for the send service.
//!
//! Exercises the full orchestration path over the in-memory adapters, plus
//! mocked repository failures for error propagation.

use std::sync::Arc;

use mockable::DefaultClock;
use rstest::rstest;

use crate::media::{error::MediaStoreError, memory::InMemoryMediaStore};
use crate::message::{
    adapters::memory::InMemoryMessageRepository,
    domain::{
        ConversationKey, ImageRef, Message, MessageBody, MessageDraft, MessageId, MessageKind,
        UserId,
    },
    error::{RepositoryError, ValidationError},
    ports::repository::{MessageRepository, RepositoryResult},
    services::send::{MessageService, SendError},
    validation::service::DefaultMessageValidator,
};

mockall::mock! {
    Repo {}

    #[async_trait::async_trait]
    impl MessageRepository for Repo {
        async fn append(&self, draft: MessageDraft) -> RepositoryResult<Message>;
        async fn find_by_id(&self, id: MessageId) -> RepositoryResult<Option<Message>>;
        async fn list_conversation(
            &self,
            conversation: ConversationKey,
        ) -> RepositoryResult<Vec<Message>>;
    }
}

type MemoryService =
    MessageService<InMemoryMessageRepository, InMemoryMediaStore, DefaultMessageValidator, DefaultClock>;

fn memory_service() -> (MemoryService, InMemoryMessageRepository, InMemoryMediaStore) {
    let repo = InMemoryMessageRepository::new();
    let media = InMemoryMediaStore::new();
    let service = MessageService::new(
        Arc::new(repo.clone()),
        Arc::new(media.clone()),
        DefaultMessageValidator::new(),
        Arc::new(DefaultClock),
    );
    (service, repo, media)
}

#[rstest]
#[tokio::test]
async fn send_text_stores_a_sequenced_message() {
    let (service, repo, _media) = memory_service();
    let sender = UserId::new();
    let recipient = UserId::new();

    let message = service
        .send_text(sender, recipient, "hello")
        .await
        .expect("send succeeds");

    assert_eq!(message.kind(), MessageKind::Text);
    assert_eq!(message.sender_id(), sender);
    assert_eq!(message.recipient_id(), recipient);
    assert_eq!(message.sequence_number().value(), 1);
    assert_eq!(repo.len(), 1);
}

#[rstest]
#[tokio::test]
async fn send_text_rejects_blank_text_without_storing() {
    let (service, repo, _media) = memory_service();

    let result = service
        .send_text(UserId::new(), UserId::new(), "   ")
        .await;

    assert!(matches!(
        result,
        Err(SendError::Validation(ValidationError::EmptyText))
    ));
    assert!(repo.is_empty());
}

#[rstest]
#[tokio::test]
async fn send_text_rejects_self_conversation() {
    let (service, repo, _media) = memory_service();
    let user = UserId::new();

    let result = service.send_text(user, user, "hello me").await;

    assert!(matches!(
        result,
        Err(SendError::Validation(ValidationError::SelfConversation))
    ));
    assert!(repo.is_empty());
}

#[rstest]
#[tokio::test]
async fn send_image_stores_blob_and_message() {
    let (service, repo, media) = memory_service();
    let bytes = b"fake image bytes".to_vec();

    let message = service
        .send_image(UserId::new(), UserId::new(), bytes.clone(), "image/png")
        .await
        .expect("send succeeds");

    assert_eq!(message.kind(), MessageKind::Image);
    assert_eq!(repo.len(), 1);
    assert_eq!(media.len(), 1);

    let MessageBody::Image(image) = message.body() else {
        panic!("expected image body");
    };
    let loaded = service
        .open_image(&image.image_ref)
        .await
        .expect("blob retrievable");
    assert_eq!(loaded, bytes);
}

#[rstest]
#[tokio::test]
async fn send_image_rejects_non_image_mime() {
    let (service, repo, _media) = memory_service();

    let result = service
        .send_image(UserId::new(), UserId::new(), b"bytes".to_vec(), "text/plain")
        .await;

    assert!(matches!(
        result,
        Err(SendError::Validation(ValidationError::UnsupportedImageType(_)))
    ));
    assert!(repo.is_empty());
}

#[rstest]
#[tokio::test]
async fn send_image_rejects_empty_payload() {
    let (service, repo, _media) = memory_service();

    let result = service
        .send_image(UserId::new(), UserId::new(), Vec::new(), "image/png")
        .await;

    assert!(matches!(
        result,
        Err(SendError::Media(MediaStoreError::EmptyContent))
    ));
    assert!(repo.is_empty());
}

#[rstest]
#[tokio::test]
async fn conversation_listing_is_symmetric() {
    let (service, _repo, _media) = memory_service();
    let a = UserId::new();
    let b = UserId::new();

    service.send_text(a, b, "from a").await.expect("send");
    service.send_text(b, a, "from b").await.expect("send");

    let forward = service.conversation(a, b).await.expect("list succeeds");
    let backward = service.conversation(b, a).await.expect("list succeeds");

    assert_eq!(forward.len(), 2);
    assert_eq!(forward, backward);
}

#[rstest]
#[tokio::test]
async fn conversation_rejects_identical_participants() {
    let (service, _repo, _media) = memory_service();
    let user = UserId::new();

    let result = service.conversation(user, user).await;

    assert!(matches!(
        result,
        Err(SendError::Validation(ValidationError::SelfConversation))
    ));
}

#[rstest]
#[tokio::test]
async fn open_image_surfaces_unknown_reference() {
    let (service, _repo, _media) = memory_service();
    let image_ref: ImageRef = "0a1b2c3d.jpg".parse().expect("valid reference");

    let result = service.open_image(&image_ref).await;

    assert!(matches!(
        result,
        Err(SendError::Media(MediaStoreError::NotFound(_)))
    ));
}

#[rstest]
#[tokio::test]
async fn repository_failure_propagates_from_send() {
    let mut repo = MockRepo::new();
    repo.expect_append()
        .returning(|_| Err(RepositoryError::connection("database offline")));

    let service = MessageService::new(
        Arc::new(repo),
        Arc::new(InMemoryMediaStore::new()),
        DefaultMessageValidator::new(),
        Arc::new(DefaultClock),
    );

    let result = service
        .send_text(UserId::new(), UserId::new(), "hello")
        .await;

    assert!(matches!(
        result,
        Err(SendError::Repository(RepositoryError::Connection(_)))
    ));
}
