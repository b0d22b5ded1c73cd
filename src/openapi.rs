/// OpenAPI documentation for the Ripple API
use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Ripple API",
        version = "0.1.0",
        description = "Accounts, profiles, posts, comments, likes, and follows",
        license(name = "MIT")
    ),
    servers(
        (url = "http://localhost:8080", description = "Development server"),
    ),
    tags(
        (name = "Health", description = "Service health checks"),
        (name = "Auth", description = "Registration and bearer-token lifecycle"),
        (name = "Users", description = "Account management"),
        (name = "Profiles", description = "Public social identities and follows"),
        (name = "Posts", description = "Post creation, listing, and likes"),
        (name = "Comments", description = "Comment creation and management"),
    )
)]
pub struct ApiDoc;
