use rocket::Route;

mod positions;
mod wizard;

pub fn routes() -> Vec<Route> {
    let mut routes = Vec::new();
    routes.extend(positions::routes());
    routes.extend(wizard::routes());
    routes
}
