use crate::api::{AuthenticatedContext, RequestContext};
use crate::common::flash;
use crate::usecases::messages;
use crate::views;
use axum::response::Html;

pub async fn index(ctx: RequestContext) -> Html<String> {
    let identity = ctx.identity().await;
    let unread_count = match &identity {
        Some(identity) => messages::unread_count(&ctx, identity.user_id)
            .await
            .unwrap_or_default(),
        None => 0,
    };
    let flashes = flash::take(&ctx.session).await;
    Html(views::pages::index(identity.as_ref(), &flashes, unread_count))
}

pub async fn dashboard(ctx: AuthenticatedContext) -> Html<String> {
    let unread_count = messages::unread_count(&ctx, ctx.identity.user_id)
        .await
        .unwrap_or_default();
    let flashes = flash::take(&ctx.session).await;
    Html(views::pages::dashboard(&ctx.identity, &flashes, unread_count))
}
