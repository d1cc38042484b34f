//! Entity CRUD routes: one collection and one item route per record type.

use crate::handlers::entity::{create, delete as delete_handler, list, read, update};
use crate::model::{Appointment, Entity, Role, Sale, User, Vehicle};
use crate::state::AppState;
use axum::{routing::get, Router};

fn entity_router<T: Entity>() -> Router<AppState> {
    Router::new()
        .route("/", get(list::<T>).post(create::<T>))
        .route(
            "/:id",
            get(read::<T>)
                .put(update::<T>)
                .patch(update::<T>)
                .delete(delete_handler::<T>),
        )
}

fn nest<T: Entity>(router: Router<AppState>) -> Router<AppState> {
    router.nest(&format!("/{}", T::def().path), entity_router::<T>())
}

/// `/roles`, `/usuarios`, `/vehiculos`, `/ventas`, `/citas`, each with `/:id`.
pub fn entity_routes(state: AppState) -> Router {
    let router = Router::new();
    let router = nest::<Role>(router);
    let router = nest::<User>(router);
    let router = nest::<Vehicle>(router);
    let router = nest::<Sale>(router);
    let router = nest::<Appointment>(router);
    router.with_state(state)
}
