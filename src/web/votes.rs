//! Vote endpoints

use crate::app_config;
use crate::middleware::ClientCtx;
use crate::votes::{self, Thresholds, VoteError};
use actix_web::{get, post, web, HttpResponse};
use sea_orm::DatabaseConnection;
use serde::Deserialize;

pub(super) fn configure(conf: &mut actix_web::web::ServiceConfig) {
    conf.service(cast_vote).service(view_votes);
}

#[derive(Deserialize)]
pub struct VoteBody {
    #[serde(default)]
    pub vote: String,
}

fn thresholds() -> Thresholds {
    Thresholds::from(&app_config::moderation())
}

/// Cast, repeat or switch a vote on an event or resource.
#[post("/votes/{item_type}/{item_id}")]
async fn cast_vote(
    client: ClientCtx,
    db: web::Data<DatabaseConnection>,
    path: web::Path<(String, i32)>,
    body: web::Json<VoteBody>,
) -> Result<HttpResponse, VoteError> {
    let (item_type, item_id) = path.into_inner();

    let receipt = votes::cast_vote(
        db.get_ref(),
        client.get_id(),
        &item_type,
        item_id,
        &body.vote,
        &thresholds(),
    )
    .await?;

    Ok(HttpResponse::Ok().json(receipt))
}

/// Counters, status and the caller's own vote for an item.
#[get("/votes/{item_type}/{item_id}")]
async fn view_votes(
    client: ClientCtx,
    db: web::Data<DatabaseConnection>,
    path: web::Path<(String, i32)>,
) -> Result<HttpResponse, VoteError> {
    let (item_type, item_id) = path.into_inner();
    let kind = votes::parse_item_kind(&item_type)?;

    let summary = votes::summarize(db.get_ref(), client.get_id(), kind, item_id).await?;

    Ok(HttpResponse::Ok().json(summary))
}
