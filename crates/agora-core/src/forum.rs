//! Forum operations built on the facade.
//!
//! Typed entry points for each forum listing and edit. Response counts and
//! cascading deletes are kept by the facade underneath.

use tracing::{debug, instrument};

use crate::Result;
use crate::facade::{CascadeReport, ListRequest, Page, QueryFacade, SortKey};
use crate::repo::{FieldFilter, Record, SortDirection};
use crate::schema::{
    Discussion, DiscussionPatch, Report, ReportPatch, ReportStatus, Response, ResponsePatch, Role,
    UserProfile, UserProfilePatch,
};
use crate::session::Identity;
use crate::traits::Store;
use crate::types::{Collection, Cursor, RecordId};

/// Category value meaning "no category filter".
pub const ALL_CATEGORIES: &str = "all";

/// Fields of a discussion chosen by its author.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewDiscussion {
    pub title: String,
    pub content: String,
    pub category: String,
}

/// Options for listing discussions.
#[derive(Debug, Clone, Default)]
pub struct DiscussionQuery {
    /// `None` or [`ALL_CATEGORIES`] lists every category.
    pub category: Option<String>,
    pub sort: SortKey,
    pub direction: SortDirection,
    pub page_size: Option<u32>,
    pub cursor: Option<Cursor>,
    pub search: Option<String>,
}

impl DiscussionQuery {
    fn into_request(self) -> ListRequest {
        let mut request = ListRequest::new()
            .sort(self.sort, self.direction)
            .after(self.cursor);
        request.page_size = self.page_size;
        if let Some(term) = self.search {
            request = request.search(term);
        }
        match self.category {
            Some(category) if category != ALL_CATEGORIES => request.filter("category", category),
            _ => request,
        }
    }
}

/// What a user reports.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewReport {
    pub target_collection: Collection,
    pub target_id: RecordId,
    pub reason: String,
}

/// Forum data access: discussions, responses, users and reports.
#[derive(Debug, Clone)]
pub struct Forum<S> {
    facade: QueryFacade<S>,
}

impl<S: Store> Forum<S> {
    pub fn new(facade: QueryFacade<S>) -> Self {
        Self { facade }
    }

    pub fn facade(&self) -> &QueryFacade<S> {
        &self.facade
    }

    // ========================================================================
    // Discussions
    // ========================================================================

    /// Start a discussion authored by `author`.
    pub async fn add_discussion(
        &self,
        author: &Identity,
        discussion: NewDiscussion,
    ) -> Result<RecordId> {
        let document = Discussion {
            title: discussion.title,
            content: discussion.content,
            category: discussion.category,
            author_id: author.uid.clone(),
            author_name: author.display_name.clone(),
            response_count: 0,
        };
        self.facade.create(&document).await
    }

    pub async fn discussions(&self, query: DiscussionQuery) -> Result<Page<Record<Discussion>>> {
        self.facade.list_as(&query.into_request()).await
    }

    pub async fn discussion(&self, id: &RecordId) -> Result<Record<Discussion>> {
        self.facade.get(id).await
    }

    pub async fn update_discussion(&self, id: &RecordId, patch: &DiscussionPatch) -> Result<()> {
        self.facade.update::<Discussion>(id, patch).await
    }

    /// Delete a discussion together with all of its responses.
    pub async fn delete_discussion(&self, id: &RecordId) -> Result<CascadeReport> {
        self.facade.delete(Collection::Discussions, id).await
    }

    /// Discussions started by a user, newest first.
    pub async fn user_discussions(&self, user_id: &RecordId) -> Result<Vec<Record<Discussion>>> {
        self.facade
            .select_as(
                Some(FieldFilter::equals("authorId", user_id.as_str())),
                Some((SortKey::CreatedAt, SortDirection::Desc)),
            )
            .await
    }

    // ========================================================================
    // Responses
    // ========================================================================

    /// Post a response; the discussion's response count follows.
    ///
    /// Fails with `NotFound` if the discussion does not exist.
    #[instrument(skip(self, author, content), fields(%discussion_id))]
    pub async fn add_response(
        &self,
        author: &Identity,
        discussion_id: &RecordId,
        content: impl Into<String>,
    ) -> Result<RecordId> {
        let response = Response {
            discussion_id: discussion_id.clone(),
            content: content.into(),
            author_id: author.uid.clone(),
            author_name: author.display_name.clone(),
        };
        let id = self.facade.create(&response).await?;
        debug!(%id, "Added response");
        Ok(id)
    }

    /// Responses of a discussion, oldest first.
    pub async fn responses(&self, discussion_id: &RecordId) -> Result<Vec<Record<Response>>> {
        self.facade
            .select_as(
                Some(FieldFilter::equals("discussionId", discussion_id.as_str())),
                Some((SortKey::CreatedAt, SortDirection::Asc)),
            )
            .await
    }

    pub async fn update_response(&self, id: &RecordId, patch: &ResponsePatch) -> Result<()> {
        self.facade.update::<Response>(id, patch).await
    }

    /// Delete a response; the discussion's response count follows.
    pub async fn delete_response(&self, id: &RecordId) -> Result<()> {
        self.facade.delete(Collection::Responses, id).await.map(|_| ())
    }

    // ========================================================================
    // Users
    // ========================================================================

    /// A user's profile, or `None` if they have not created one.
    pub async fn user_profile(&self, uid: &RecordId) -> Result<Option<Record<UserProfile>>> {
        match self.facade.get(uid).await {
            Ok(record) => Ok(Some(record)),
            Err(e) if e.is_not_found() => Ok(None),
            Err(e) => Err(e),
        }
    }

    /// Create the profile of a newly signed-up user, keyed by their uid.
    pub async fn create_user_profile(
        &self,
        identity: &Identity,
        name: impl Into<String>,
        email: impl Into<String>,
    ) -> Result<()> {
        let profile = UserProfile {
            uid: identity.uid.clone(),
            name: name.into(),
            email: email.into(),
            photo_url: String::new(),
            role: Role::User,
        };
        self.facade.set(&identity.uid, &profile).await
    }

    pub async fn update_user_profile(&self, uid: &RecordId, patch: &UserProfilePatch) -> Result<()> {
        self.facade.update::<UserProfile>(uid, patch).await
    }

    pub async fn all_users(&self) -> Result<Vec<Record<UserProfile>>> {
        self.facade.select_as(None, None).await
    }

    /// Change a user's role. The store's own access rules decide who may.
    #[instrument(skip(self), fields(%uid, %role))]
    pub async fn update_user_role(&self, uid: &RecordId, role: Role) -> Result<()> {
        let mut fields = serde_json::Map::new();
        fields.insert("role".to_string(), serde_json::to_value(role)?);
        self.facade
            .store()
            .update_document(Collection::Users, uid, fields)
            .await
    }

    // ========================================================================
    // Reports
    // ========================================================================

    /// File a pending report.
    pub async fn create_report(&self, reporter: &Identity, report: NewReport) -> Result<RecordId> {
        let document = Report {
            target_collection: report.target_collection,
            target_id: report.target_id,
            reason: report.reason,
            reporter_id: reporter.uid.clone(),
            status: ReportStatus::Pending,
        };
        self.facade.create(&document).await
    }

    /// All reports, newest first.
    pub async fn reports(&self) -> Result<Vec<Record<Report>>> {
        self.facade
            .select_as(None, Some((SortKey::CreatedAt, SortDirection::Desc)))
            .await
    }

    pub async fn delete_report(&self, id: &RecordId) -> Result<()> {
        self.facade.delete(Collection::Reports, id).await.map(|_| ())
    }

    pub async fn update_report_status(&self, id: &RecordId, status: ReportStatus) -> Result<()> {
        let patch = ReportPatch {
            status: Some(status),
        };
        self.facade.update::<Report>(id, &patch).await
    }
}
