use std::sync::Arc;

use ecoleta_core::{
    form::{Effect, FormEvent},
    service::RegistrationService,
};
use tokio::sync::mpsc::UnboundedSender;
use tracing::{debug, warn};

/// Completion of an effect, tagged with the form session that requested it.
pub(crate) type Completion = (u64, FormEvent);

/// Spawn every effect; each completion is sent back to the event loop.
pub(crate) fn spawn(
    effects: Vec<Effect>,
    session: u64,
    service: &Arc<RegistrationService>,
    completions: &UnboundedSender<Completion>,
) {
    for effect in effects {
        let service = Arc::clone(service);
        let completions = completions.clone();
        tokio::spawn(async move {
            let event = run(&service, effect).await;
            if completions.send((session, event)).is_err() {
                debug!("event loop closed before completion arrived");
            }
        });
    }
}

pub(crate) async fn run(service: &RegistrationService, effect: Effect) -> FormEvent {
    match effect {
        Effect::Locate => FormEvent::LocationResolved(service.locate().await),
        Effect::LoadCategories => FormEvent::CategoriesLoaded(service.categories().await),
        Effect::LoadStates => FormEvent::StatesLoaded(service.states().await),
        Effect::LoadCities(request) => {
            let result = service.cities(&request.uf).await;
            FormEvent::CitiesLoaded { request, result }
        }
        Effect::Submit(record) => {
            if record.has_unset_location() {
                warn!("submitting collection point without state or city");
            }
            FormEvent::SubmissionFinished(service.register(&record).await)
        }
    }
}
