use rocket::Route;

mod reference;
mod search;

pub fn routes() -> Vec<Route> {
    let mut routes = Vec::new();
    routes.extend(search::routes());
    routes.extend(reference::routes());
    routes
}
