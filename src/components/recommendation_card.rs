use log::error;
use wasm_bindgen_futures::spawn_local;
use yew::prelude::*;

use crate::api::ApiClient;
use crate::cache::{self, use_invalidate};
use crate::components::icons::icon_sparkles;
use crate::components::toast::use_toast;
use crate::features::recommendations::{card_effect, update_status, CardEvent, Recommendation};
use crate::route::{use_navigator, Route};
use crate::session::use_session;
use crate::storage::store_recommendation_action;

#[derive(Properties, PartialEq)]
pub struct RecommendationCardProps {
    pub recommendation: Recommendation,
}

#[function_component(RecommendationCard)]
pub fn recommendation_card(props: &RecommendationCardProps) -> Html {
    let session = use_session();
    let toaster = use_toast();
    let navigator = use_navigator();
    let invalidate = use_invalidate();

    {
        let recommendation = props.recommendation.clone();
        let session = session.clone();
        use_effect_with_deps(
            move |id| {
                if let Some(call) = card_effect(&recommendation, &CardEvent::Mounted).status_call {
                    let client = ApiClient::new(session.as_ref());
                    let id = *id;
                    spawn_local(async move {
                        if let Err(e) = update_status(&client, id, call).await {
                            error!("could not mark recommendation {} as viewed: {}", id, e);
                        }
                    });
                }
                || ()
            },
            props.recommendation.id,
        );
    }

    let on_dismiss = {
        let recommendation = props.recommendation.clone();
        let session = session.clone();
        let toaster = toaster.clone();
        let invalidate = invalidate.clone();
        Callback::from(move |_| {
            let Some(call) = card_effect(&recommendation, &CardEvent::Dismiss).status_call else {
                return;
            };
            let client = ApiClient::new(session.as_ref());
            let id = recommendation.id;
            let toaster = toaster.clone();
            let invalidate = invalidate.clone();
            spawn_local(async move {
                match update_status(&client, id, call).await {
                    Ok(()) => {
                        invalidate.emit(cache::RECOMMENDATIONS);
                        if let Some(toaster) = toaster.as_ref() {
                            toaster.success("Recomendación descartada");
                        }
                    }
                    Err(e) => {
                        error!("could not dismiss recommendation {}: {}", id, e);
                        if let Some(toaster) = toaster.as_ref() {
                            toaster.error("Error al descartar la recomendación");
                        }
                    }
                }
            });
        })
    };

    let action_buttons = props.recommendation.actions.iter().enumerate().map(|(index, action)| {
        let recommendation = props.recommendation.clone();
        let session = session.clone();
        let navigator = navigator.clone();
        let invalidate = invalidate.clone();
        let onclick = Callback::from(move |_| {
            let effect = card_effect(&recommendation, &CardEvent::QuickAction(index));
            if let Some(call) = effect.status_call {
                let client = ApiClient::new(session.as_ref());
                let id = recommendation.id;
                let invalidate = invalidate.clone();
                spawn_local(async move {
                    match update_status(&client, id, call).await {
                        Ok(()) => invalidate.emit(cache::RECOMMENDATIONS),
                        Err(e) => error!("could not mark recommendation {} as acted: {}", id, e),
                    }
                });
            }
            if let Some(prefill) = effect.store_prefill.as_ref() {
                store_recommendation_action(prefill);
            }
            if let (Some(path), Some(navigator)) = (effect.navigate_to, navigator.as_ref()) {
                navigator.push(Route::from_href(&path));
            }
        });
        html! {
            <button key={index} type="button" {onclick}
                class="px-3 py-1.5 rounded-lg bg-[#173E63] text-white text-xs font-bold hover:bg-[#1D617A] transition-colors">
                { action.label.clone() }
            </button>
        }
    });

    let recommendation = &props.recommendation;
    html! {
        <div class="bg-card p-5 rounded-[10px] shadow-sm border border-border space-y-3">
            <div class="flex items-start justify-between gap-3">
                <div class="flex items-center gap-2 text-[#173E63]">
                    { icon_sparkles() }
                    <span class="text-[10px] font-bold uppercase tracking-widest text-muted-foreground">{ recommendation.kind.label() }</span>
                </div>
                <span class={classes!("px-2", "py-0.5", "rounded-full", "text-[10px]", "font-bold", recommendation.priority.badge_class())}>
                    { recommendation.priority.label() }
                </span>
            </div>
            <div>
                <h4 class="font-bold text-foreground">{ recommendation.title.clone() }</h4>
                <p class="text-sm text-muted-foreground mt-1">{ recommendation.description.clone() }</p>
            </div>
            <div class="flex flex-wrap items-center gap-2">
                if recommendation.actionable {
                    { for action_buttons }
                }
                <button type="button" onclick={on_dismiss}
                    class="ml-auto px-3 py-1.5 rounded-lg text-xs font-bold text-slate-500 hover:bg-secondary">
                    {"Descartar"}
                </button>
            </div>
        </div>
    }
}

