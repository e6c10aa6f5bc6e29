//! services/streaks/src/bin/openapi.rs
//!
//! Prints the OpenAPI document to stdout.

use streaks_lib::web::rest::ApiDoc;
use utoipa::OpenApi;

fn main() -> Result<(), serde_json::Error> {
    let doc = ApiDoc::openapi().to_pretty_json()?;
    println!("{}", doc);
    Ok(())
}
