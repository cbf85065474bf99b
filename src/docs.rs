use utoipa::OpenApi;
use crate::{error, handlers, models};

#[derive(OpenApi)]
#[openapi(
    info(title = "garage-remote", description = "HTTP remote for a cloud-connected garage door"),
    paths(handlers::home, handlers::toggle, handlers::open_half),
    components(
        schemas(models::ToggleRequest, models::OpenHalfRequest, models::DoorState, error::ErrorBody)
    )
)]
pub struct ApiDoc;
