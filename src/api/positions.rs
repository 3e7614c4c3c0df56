use rocket::{serde::json::Json, Route, State};

use crate::error::{Error, Result};
use crate::model::{
    api::{CandidateDesc, PositionDesc},
    common::ElectionPosition,
};
use crate::store::Stores;

pub fn routes() -> Vec<Route> {
    routes![positions, candidates]
}

/// Every position on the ballot, in ballot order.
#[get("/positions")]
pub fn positions() -> Json<Vec<PositionDesc>> {
    Json(
        ElectionPosition::ORDER
            .into_iter()
            .map(PositionDesc::from)
            .collect(),
    )
}

/// The candidates standing for `position`, sorted by name.
#[get("/positions/<position>/candidates")]
pub async fn candidates(
    position: ElectionPosition,
    stores: &State<Stores>,
) -> Result<Json<Vec<CandidateDesc>>> {
    let candidates = stores
        .list_by_position(position)
        .await
        .map_err(Error::FetchCandidates)?;
    Ok(Json(
        candidates.into_iter().map(CandidateDesc::from).collect(),
    ))
}

#[cfg(test)]
mod tests {
    use rocket::{
        http::Status, local::asynchronous::Client, serde::json::serde_json::Value,
    };

    use super::*;
    use crate::model::common::POSITION_COUNT;
    use crate::store::memory::MemoryStore;

    #[backend_test]
    async fn all_positions_in_order(client: Client) {
        let response = client.get(uri!(positions)).dispatch().await;
        assert_eq!(Status::Ok, response.status());

        let positions = response.into_json::<Vec<Value>>().await.unwrap();
        assert_eq!(positions.len(), POSITION_COUNT);
        assert_eq!(positions[0]["position"], "vice_president");
        assert_eq!(positions[0]["label"], "Vice President");
        assert_eq!(positions[0]["number"], 1);
        assert_eq!(positions[4]["position"], "joint_treasurer");
        assert_eq!(positions[4]["number"], 5);
    }

    #[backend_test]
    async fn candidates_sorted_by_name(client: Client) {
        let response = client
            .get("/positions/associate_secretary/candidates")
            .dispatch()
            .await;
        assert_eq!(Status::Ok, response.status());

        let candidates = response.into_json::<Vec<CandidateDesc>>().await.unwrap();
        let names = candidates
            .iter()
            .map(|candidate| candidate.name.as_str())
            .collect::<Vec<_>>();
        assert_eq!(names, vec!["Femi Lawal", "Grace Nwosu"]);
        assert!(candidates
            .iter()
            .all(|candidate| candidate.position == ElectionPosition::AssociateSecretary));
    }

    #[backend_test(empty)]
    async fn no_candidates_is_not_an_error(client: Client) {
        let response = client
            .get("/positions/secretary/candidates")
            .dispatch()
            .await;
        assert_eq!(Status::Ok, response.status());
        let candidates = response.into_json::<Vec<CandidateDesc>>().await.unwrap();
        assert!(candidates.is_empty());
    }

    #[backend_test]
    async fn unknown_position(client: Client) {
        let response = client
            .get("/positions/chancellor/candidates")
            .dispatch()
            .await;
        assert_eq!(Status::NotFound, response.status());
    }

    #[backend_test]
    async fn directory_failure(client: Client, store: MemoryStore) {
        store.fail_reads(true);
        let response = client
            .get("/positions/secretary/candidates")
            .dispatch()
            .await;
        assert_eq!(Status::BadGateway, response.status());
    }
}
