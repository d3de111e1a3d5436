use utoipa::OpenApi;
use utoipa::ToSchema;

#[derive(ToSchema)]
pub struct HealthResponse { pub status: String }

/// Any JSON object. `_id` is assigned by the store on insert.
#[derive(ToSchema)]
pub struct ItemDoc { pub _id: Option<String> }

#[derive(ToSchema)]
pub struct DalleRequestDoc { pub prompt: Option<String> }

#[derive(ToSchema)]
pub struct StableDiffusionRequestDoc { pub prompt: Option<String>, pub negative_prompt: Option<String> }

#[derive(ToSchema)]
#[allow(non_snake_case)]
pub struct StoredImageDoc { pub imageURL: Option<String>, pub id: String }

#[derive(ToSchema)]
#[allow(non_snake_case)]
pub struct InsertResultDoc { pub acknowledged: bool, pub insertedId: String }

#[derive(ToSchema)]
#[allow(non_snake_case)]
pub struct UpdateResultDoc {
    pub acknowledged: bool,
    pub matchedCount: u64,
    pub modifiedCount: u64,
    pub upsertedCount: u64,
    pub upsertedId: Option<String>,
}

#[derive(ToSchema)]
#[allow(non_snake_case)]
pub struct DeleteResultDoc { pub acknowledged: bool, pub deletedCount: u64 }

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::routes::health,
        crate::routes::items::create,
        crate::routes::items::list,
        crate::routes::items::update,
        crate::routes::items::delete,
        crate::routes::generation::dalle,
        crate::routes::generation::stable_diffusion,
    ),
    components(
        schemas(
            HealthResponse,
            ItemDoc,
            DalleRequestDoc,
            StableDiffusionRequestDoc,
            StoredImageDoc,
            InsertResultDoc,
            UpdateResultDoc,
            DeleteResultDoc,
        )
    ),
    tags(
        (name = "health"),
        (name = "items"),
        (name = "generation")
    )
)]
pub struct ApiDoc;
