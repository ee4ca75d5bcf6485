//! `PostgreSQL` implementation of the `MessageRepository` port using
//! Diesel ORM.
//!
//! Message bodies are stored as JSONB; the normalised conversation key is
//! materialised into two UUID columns so conversation queries and the
//! per-conversation sequence index stay symmetric in the participants.

mod blocking_helpers;

use async_trait::async_trait;
use diesel::prelude::*;

use super::models::{MessageRow, NewMessage, row_to_message};
use super::schema::messages;
use crate::message::{
    domain::{ConversationKey, Message, MessageDraft, MessageId, SequenceNumber},
    error::RepositoryError,
    ports::repository::{MessageRepository, RepositoryResult},
};

pub use blocking_helpers::PgPool;
use blocking_helpers::{get_conn, run_blocking};

/// Number of times an append is retried when a concurrent writer claims
/// the same sequence number.
const APPEND_RETRIES: usize = 3;

/// `PostgreSQL` implementation of [`MessageRepository`].
///
/// Uses Diesel ORM with connection pooling via r2d2. Thread-safe for
/// concurrent access. All database operations are offloaded to a blocking
/// thread pool via [`tokio::task::spawn_blocking`] to avoid blocking
/// the async runtime.
///
/// Appends run in a transaction that reads the conversation's current
/// maximum sequence number and latest timestamp, then inserts. A unique
/// index on `(conversation_low, conversation_high, sequence_number)`
/// detects racing writers; the losing append retries with a fresh
/// sequence number.
///
/// # Example
///
/// ```ignore
/// use diesel::r2d2::{ConnectionManager, Pool};
/// use diesel::PgConnection;
/// use parley::message::adapters::postgres::PostgresMessageRepository;
///
/// let manager = ConnectionManager::<PgConnection>::new("postgres://...");
/// let pool = Pool::builder().build(manager).expect("pool");
/// let repo = PostgresMessageRepository::new(pool);
/// ```
#[derive(Debug, Clone)]
pub struct PostgresMessageRepository {
    pool: PgPool,
}

impl PostgresMessageRepository {
    /// Creates a new repository with the given connection pool.
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Returns a reference to the connection pool.
    #[must_use]
    pub const fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Runs a single append attempt inside a transaction.
    fn append_once(pool: &PgPool, draft: &MessageDraft) -> RepositoryResult<Message> {
        let mut conn = get_conn(pool)?;
        let conversation = draft.conversation();

        conn.transaction::<_, RepositoryError, _>(|tx_conn| {
            let (max_seq, latest_created_at): (Option<i64>, Option<chrono::DateTime<chrono::Utc>>) =
                messages::table
                    .filter(messages::conversation_low.eq(conversation.low().into_inner()))
                    .filter(messages::conversation_high.eq(conversation.high().into_inner()))
                    .select((
                        diesel::dsl::max(messages::sequence_number),
                        diesel::dsl::max(messages::created_at),
                    ))
                    .first(tx_conn)?;

            let next = max_seq.unwrap_or(0).saturating_add(1);
            let next_u64 =
                u64::try_from(next).map_err(|e| RepositoryError::serialization(e.to_string()))?;
            let sequence_number = SequenceNumber::new(next_u64);

            // Clamp keeps timestamps non-decreasing along the sequence order.
            let created_at = latest_created_at
                .map_or(draft.created_at(), |latest| draft.created_at().max(latest));

            let new_message = NewMessage::from_draft(draft, sequence_number, created_at)?;
            diesel::insert_into(messages::table)
                .values(&new_message)
                .execute(tx_conn)?;

            Ok(Message::from_draft(draft.clone(), sequence_number, created_at))
        })
    }
}

#[async_trait]
impl MessageRepository for PostgresMessageRepository {
    async fn append(&self, draft: MessageDraft) -> RepositoryResult<Message> {
        let mut last_err = None;

        for attempt in 0..APPEND_RETRIES {
            let pool = self.pool.clone();
            let attempt_draft = draft.clone();
            let result =
                run_blocking(move || Self::append_once(&pool, &attempt_draft)).await;

            match result {
                Ok(message) => return Ok(message),
                Err(err) if err.is_unique_violation() => {
                    tracing::debug!(
                        message_id = %draft.id(),
                        attempt,
                        "sequence collision on append, retrying"
                    );
                    last_err = Some(err);
                }
                Err(err) => return Err(err),
            }
        }

        Err(last_err.unwrap_or_else(|| {
            RepositoryError::connection("append retries exhausted without an error")
        }))
    }

    async fn find_by_id(&self, id: MessageId) -> RepositoryResult<Option<Message>> {
        let pool = self.pool.clone();

        let row = run_blocking(move || {
            let mut conn = get_conn(&pool)?;

            messages::table
                .filter(messages::id.eq(id.into_inner()))
                .select(MessageRow::as_select())
                .first::<MessageRow>(&mut conn)
                .optional()
                .map_err(RepositoryError::from)
        })
        .await?;

        match row {
            Some(found) => Ok(Some(row_to_message(found)?)),
            None => Ok(None),
        }
    }

    async fn list_conversation(
        &self,
        conversation: ConversationKey,
    ) -> RepositoryResult<Vec<Message>> {
        let pool = self.pool.clone();

        let rows = run_blocking(move || {
            let mut conn = get_conn(&pool)?;

            messages::table
                .filter(messages::conversation_low.eq(conversation.low().into_inner()))
                .filter(messages::conversation_high.eq(conversation.high().into_inner()))
                .order(messages::sequence_number.asc())
                .select(MessageRow::as_select())
                .load::<MessageRow>(&mut conn)
                .map_err(RepositoryError::from)
        })
        .await?;

        rows.into_iter().map(row_to_message).collect()
    }
}
