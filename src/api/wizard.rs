use std::collections::HashMap;

use log::{info, warn};
use rocket::{http::Status, serde::json::Json, Route, State};

use crate::error::{Error, Result};
use crate::model::{
    api::{CandidateChoice, NameEntry, ReviewView, RoleChoice, VotingView, WizardView},
    common::{CandidateId, ElectionPosition},
    mongodb::Id,
};
use crate::store::Stores;
use crate::wizard::{
    submission, SessionRegistry, Step, TransitionError, Wizard, WizardSession,
};

const FETCH_CANDIDATES_NOTICE: &str = "Failed to load candidates. Please try again.";
const LOOKUP_CANDIDATES_NOTICE: &str = "Failed to load candidate information.";
const SUBMIT_NOTICE: &str = "Failed to submit votes. Please try again.";

pub fn routes() -> Vec<Route> {
    routes![
        start,
        view,
        discard,
        choose_role,
        submit_name,
        mark,
        next,
        select,
        back,
        edit,
        submit,
        restart,
    ]
}

#[post("/wizard")]
pub async fn start(registry: &State<SessionRegistry>, stores: &State<Stores>) -> Json<WizardView> {
    let (session_id, mut session) = registry.create().await;
    info!("Started wizard session {session_id}");
    Json(render(session_id, &mut session, stores).await)
}

#[get("/wizard/<session_id>")]
pub async fn view(
    session_id: Id,
    registry: &State<SessionRegistry>,
    stores: &State<Stores>,
) -> Result<Json<WizardView>> {
    let mut session = registry.acquire(session_id).await?;
    Ok(Json(render(session_id, &mut session, stores).await))
}

#[delete("/wizard/<session_id>")]
pub async fn discard(session_id: Id, registry: &State<SessionRegistry>) -> Result<Status> {
    registry.remove(session_id).await?;
    info!("Discarded wizard session {session_id}");
    Ok(Status::NoContent)
}

#[post("/wizard/<session_id>/role", data = "<choice>", format = "json")]
pub async fn choose_role(
    session_id: Id,
    choice: Json<RoleChoice>,
    registry: &State<SessionRegistry>,
    stores: &State<Stores>,
) -> Result<Json<WizardView>> {
    transition(session_id, registry, stores, |wizard| {
        wizard.choose_role(choice.role)
    })
    .await
}

#[post("/wizard/<session_id>/name", data = "<entry>", format = "json")]
pub async fn submit_name(
    session_id: Id,
    entry: Json<NameEntry>,
    registry: &State<SessionRegistry>,
    stores: &State<Stores>,
) -> Result<Json<WizardView>> {
    transition(session_id, registry, stores, |wizard| {
        wizard.submit_name(&entry.name)
    })
    .await
}

/// Choose a candidate for the current position, staying on it.
#[post("/wizard/<session_id>/mark", data = "<choice>", format = "json")]
pub async fn mark(
    session_id: Id,
    choice: Json<CandidateChoice>,
    registry: &State<SessionRegistry>,
    stores: &State<Stores>,
) -> Result<Json<WizardView>> {
    let mut session = registry.acquire(session_id).await?;
    let candidate = standing_candidate(session_id, &mut session, &choice.candidate_id, stores).await?;
    session.wizard.mark(candidate)?;
    session.notice = None;
    Ok(Json(render(session_id, &mut session, stores).await))
}

/// Confirm the current position's choice and move on.
#[post("/wizard/<session_id>/next")]
pub async fn next(
    session_id: Id,
    registry: &State<SessionRegistry>,
    stores: &State<Stores>,
) -> Result<Json<WizardView>> {
    transition(session_id, registry, stores, Wizard::next).await
}

/// Choose a candidate for the current position and move on.
#[post("/wizard/<session_id>/select", data = "<choice>", format = "json")]
pub async fn select(
    session_id: Id,
    choice: Json<CandidateChoice>,
    registry: &State<SessionRegistry>,
    stores: &State<Stores>,
) -> Result<Json<WizardView>> {
    let mut session = registry.acquire(session_id).await?;
    let candidate = standing_candidate(session_id, &mut session, &choice.candidate_id, stores).await?;
    session.wizard.select(candidate)?;
    session.notice = None;
    Ok(Json(render(session_id, &mut session, stores).await))
}

#[post("/wizard/<session_id>/back")]
pub async fn back(
    session_id: Id,
    registry: &State<SessionRegistry>,
    stores: &State<Stores>,
) -> Result<Json<WizardView>> {
    transition(session_id, registry, stores, Wizard::back).await
}

#[post("/wizard/<session_id>/edit/<position>")]
pub async fn edit(
    session_id: Id,
    position: ElectionPosition,
    registry: &State<SessionRegistry>,
    stores: &State<Stores>,
) -> Result<Json<WizardView>> {
    transition(session_id, registry, stores, |wizard| wizard.edit(position)).await
}

/// Store the reviewed ballot. On failure the session stays in review with
/// every selection intact, so the voter can simply try again.
#[post("/wizard/<session_id>/submit")]
pub async fn submit(
    session_id: Id,
    registry: &State<SessionRegistry>,
    stores: &State<Stores>,
) -> Result<Json<WizardView>> {
    let mut session = registry.acquire(session_id).await?;
    let outcome = submission::submit(stores, session.wizard.ready_to_submit()?).await;
    match outcome {
        Ok(voter_id) => {
            session.wizard.complete(voter_id)?;
            session.notice = None;
            info!("Wizard session {session_id} submitted as voter {voter_id}");
        }
        Err(err) => {
            session.notice = Some(SUBMIT_NOTICE.to_string());
            return Err(err);
        }
    }
    Ok(Json(render(session_id, &mut session, stores).await))
}

#[post("/wizard/<session_id>/restart")]
pub async fn restart(
    session_id: Id,
    registry: &State<SessionRegistry>,
    stores: &State<Stores>,
) -> Result<Json<WizardView>> {
    transition(session_id, registry, stores, Wizard::start_over).await
}

/// Apply one event that needs no store access, then render the result.
async fn transition<F>(
    session_id: Id,
    registry: &SessionRegistry,
    stores: &Stores,
    event: F,
) -> Result<Json<WizardView>>
where
    F: FnOnce(&mut Wizard) -> std::result::Result<Step, TransitionError>,
{
    let mut session = registry.acquire(session_id).await?;
    event(&mut session.wizard)?;
    session.notice = None;
    Ok(Json(render(session_id, &mut session, stores).await))
}

/// Check that `candidate_id` is standing for the position being voted on.
/// A directory failure is recorded on the session as well as returned.
async fn standing_candidate(
    session_id: Id,
    session: &mut WizardSession,
    candidate_id: &CandidateId,
    stores: &Stores,
) -> Result<CandidateId> {
    let position = session.wizard.current_position("select a candidate")?;
    if candidate_id.trim().is_empty() {
        return Err(TransitionError::EmptyCandidate.into());
    }
    let candidates = match stores.list_by_position(position).await {
        Ok(candidates) => candidates,
        Err(err) => {
            warn!("Session {session_id}: could not check candidate '{candidate_id}'");
            session.notice = Some(FETCH_CANDIDATES_NOTICE.to_string());
            return Err(Error::FetchCandidates(err));
        }
    };
    candidates
        .into_iter()
        .find(|candidate| candidate.id == *candidate_id)
        .map(|candidate| candidate.id)
        .ok_or_else(|| Error::not_found(format!("Candidate '{candidate_id}' for {position}")))
}

/// Build the view for the session's current step, fetching whatever
/// candidate data it shows. Directory failures are recovered here: the view
/// is rendered without the data and the session gets a notice, which the
/// next successful fetch of the same data takes away again.
async fn render(session_id: Id, session: &mut WizardSession, stores: &Stores) -> WizardView {
    let step = session.wizard.step();
    let view = WizardView::new(session_id, &session.wizard);

    let view = if let Some(position) = step.position() {
        let candidates = match stores.list_by_position(position).await {
            Ok(candidates) => {
                clear_notice(session, FETCH_CANDIDATES_NOTICE);
                candidates
            }
            Err(err) => {
                warn!("Session {session_id}: {}", Error::FetchCandidates(err));
                session.notice = Some(FETCH_CANDIDATES_NOTICE.to_string());
                Vec::new()
            }
        };
        let selected = session.wizard.session().selection(position);
        view.with_voting(VotingView::new(position, candidates, selected))
    } else if step == Step::Review {
        let ids = session.wizard.session().selected_ids();
        let known = match stores.lookup_by_ids(&ids).await {
            Ok(known) => {
                clear_notice(session, LOOKUP_CANDIDATES_NOTICE);
                known
            }
            Err(err) => {
                warn!("Session {session_id}: {}", Error::FetchCandidates(err));
                session.notice = Some(LOOKUP_CANDIDATES_NOTICE.to_string());
                HashMap::new()
            }
        };
        view.with_review(ReviewView::new(session.wizard.session(), &known))
    } else {
        view
    };

    view.with_notice(session.notice.clone())
}

/// Drop `notice` if it is the one the session is showing.
fn clear_notice(session: &mut WizardSession, notice: &str) {
    if session.notice.as_deref() == Some(notice) {
        session.notice = None;
    }
}
