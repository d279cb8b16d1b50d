//! OpenAPI documentation.

use utoipa::OpenApi;

use crate::error;
use crate::handlers;
use pixlift_core::models;

/// Returns the OpenAPI spec served at /api/openapi.json.
pub fn get_openapi_spec() -> utoipa::openapi::OpenApi {
    ApiDoc::openapi()
}

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Pixlift API",
        version = "0.1.0",
        description = "AI product-photo generation API with a per-user media library. Generated images and videos are stored per user with quota tracking and signed download URLs."
    ),
    paths(
        // Library
        handlers::library::list_library,
        handlers::library::get_library_item,
        handlers::library::delete_library_item,
        handlers::library::batch_delete_library,
        handlers::library::get_usage,
        // Generation
        handlers::generate::generate,
        handlers::angles::angles,
        handlers::product_enhance::product_enhance,
        handlers::fashion_motion::fashion_motion
    ),
    components(
        schemas(
            // Core models
            models::MediaType,
            models::GenerationSource,
            models::ItemMetadata,
            models::LibraryItem,
            models::LibraryItemWithUrl,
            models::LibraryUsage,
            // Library request/response bodies
            handlers::library::LibraryQuery,
            handlers::library::ListLibraryResponse,
            handlers::library::GetLibraryItemResponse,
            handlers::library::DeleteLibraryItemResponse,
            handlers::library::BatchDeleteRequest,
            handlers::library::BatchDeleteResponse,
            handlers::library::UsageResponse,
            // Generation request/response bodies
            handlers::Prediction,
            handlers::generate::GenerateRequest,
            handlers::generate::GenerateResponse,
            handlers::angles::AnglesRequest,
            handlers::angles::Angle,
            handlers::angles::AnglesResponse,
            handlers::product_enhance::ProductEnhanceRequest,
            handlers::product_enhance::ProductEnhanceResponse,
            handlers::fashion_motion::FashionMotionRequest,
            handlers::fashion_motion::VideoArtifact,
            handlers::fashion_motion::FashionMotionResponse,
            // Errors
            error::ErrorResponse
        )
    ),
    tags(
        (name = "library", description = "Per-user media library: list, fetch, delete, and storage usage"),
        (name = "generation", description = "AI image and video generation with automatic library saves")
    )
)]
pub struct ApiDoc;
