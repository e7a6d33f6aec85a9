use actix_web::web;
use utoipa::OpenApi;
use utoipa::{
    Modify,
    openapi::security::{Http, HttpAuthScheme, SecurityScheme},
};
use utoipa_swagger_ui::SwaggerUi;

use crate::entities::{
    ChapterPolicy, GiftPaymentStatus, GiftType, MembershipStatus, NovelStatus, UserRole,
};
use crate::external::PaymentMethod;
use crate::handlers;
use crate::models::*;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.as_mut().unwrap();
        components.add_security_scheme(
            "bearer_auth",
            SecurityScheme::Http(Http::new(HttpAuthScheme::Bearer)),
        )
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        handlers::auth::register,
        handlers::auth::login,
        handlers::auth::refresh,
        handlers::user::get_current_user,
        handlers::user::update_profile,
        handlers::novel::list_novels,
        handlers::novel::create_novel,
        handlers::novel::list_author_novels,
        handlers::novel::novel_detail,
        handlers::novel::update_novel,
        handlers::novel::delete_novel,
        handlers::novel::chapter_view,
        handlers::novel::create_chapter,
        handlers::novel::update_chapter,
        handlers::comment::list_comments,
        handlers::comment::create_comment,
        handlers::comment::update_comment,
        handlers::comment::delete_comment,
        handlers::gift::list_gifts,
        handlers::gift::chapter_gift_list,
        handlers::gift::send_gift,
        handlers::payment::list_plans,
        handlers::payment::create_payment_intent,
        handlers::payment::gift_payment_intent,
        handlers::payment::confirm_payment,
        handlers::payment::confirm_gift_payment,
        handlers::reading::reading_stats,
        handlers::reading::record_reading,
        handlers::bookshelf::list_bookshelf,
        handlers::bookshelf::add_to_bookshelf,
        handlers::bookshelf::remove_from_bookshelf,
        handlers::contact::submit_contact_form,
        handlers::admin::list_users,
        handlers::admin::approve_user,
        handlers::admin::list_tags,
        handlers::admin::create_tag,
        handlers::admin::delete_tag,
        handlers::admin::refresh_word_counts,
    ),
    components(
        schemas(
            ApiError,
            RegisterRequest,
            LoginRequest,
            AuthResponse,
            ProfileResponse,
            UpdateProfileRequest,
            CurrentUserResponse,
            UserRole,
            NovelStatus,
            ChapterPolicy,
            NovelQuery,
            CreateNovelRequest,
            UpdateNovelRequest,
            NovelSummary,
            NovelDetailResponse,
            NovelBrief,
            TagResponse,
            ChapterSummary,
            ChapterViewResponse,
            UpsertChapterRequest,
            CreateCommentRequest,
            UpdateCommentRequest,
            CommentResponse,
            GiftType,
            GiftPaymentStatus,
            GiftResponse,
            ChapterGiftResponse,
            ChapterGiftListResponse,
            GiftIntentRequest,
            GiftIntentResponse,
            SendGiftRequest,
            ConfirmGiftPaymentRequest,
            ConfirmGiftPaymentResponse,
            PaymentMethod,
            MembershipStatus,
            MembershipPlanResponse,
            MembershipResponse,
            CreateMembershipIntentRequest,
            CreateMembershipIntentResponse,
            ConfirmPaymentRequest,
            ConfirmPaymentResponse,
            ReadingFilter,
            ReadingStatsQuery,
            ReadingStatEntry,
            RecordReadingRequest,
            BookshelfItem,
            AddBookshelfRequest,
            ContactFormRequest,
            AdminUserRow,
            CreateTagRequest,
            PaginationInfo,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "auth", description = "Authentication API"),
        (name = "user", description = "User profile API"),
        (name = "novel", description = "Novel management API"),
        (name = "chapter", description = "Chapter reading/authoring API"),
        (name = "comment", description = "Chapter comment API"),
        (name = "gift", description = "Chapter gift API"),
        (name = "payment", description = "Membership & gift payment API"),
        (name = "reading", description = "Reading time API"),
        (name = "bookshelf", description = "Bookshelf API"),
        (name = "contact", description = "Contact form API"),
        (name = "admin", description = "Admin API"),
    ),
    info(
        title = "Wenku Backend API",
        version = "1.0.0",
        description = "Serialized fiction publishing & membership REST API documentation"
    ),
    servers(
        (url = "/api", description = "Local server")
    )
)]
pub struct ApiDoc;

pub fn swagger_config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        SwaggerUi::new("/swagger-ui/{_:.*}").url("/api-docs/openapi.json", ApiDoc::openapi()),
    )
    .route(
        "/swagger-ui",
        web::get().to(|| async {
            actix_web::HttpResponse::Found()
                .append_header(("Location", "/swagger-ui/"))
                .finish()
        }),
    );
}
