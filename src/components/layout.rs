use chrono::Utc;
use log::warn;
use wasm_bindgen_futures::spawn_local;
use yew::prelude::*;

use crate::api::ApiClient;
use crate::cache::{self, use_invalidate, use_query};
use crate::components::icons::{icon_bell, icon_log_out, menu_icon};
use crate::components::premium::{use_subscription, SubscriptionBadge};
use crate::error::AppError;
use crate::features::auth;
use crate::features::notifications::{
    badge_text, list_notifications, mark_all_as_read, mark_as_read, recommendations_headline, time_ago,
    unread_count, Notification,
};
use crate::features::recommendations::{list_recommendations, RecommendationStatus};
use crate::menu::menu_list;
use crate::route::{use_navigator, Route};
use crate::session::{clear_session, use_session, SessionHandle};

pub fn page_shell(title: &str, actions: Html, children: Html) -> Html {
    html! {
        <div class="p-6 max-w-7xl mx-auto">
            <div class="flex items-center justify-between pb-4 border-b border-border">
                <h1 class="text-2xl font-bold text-foreground">{ title.to_string() }</h1>
                { actions }
            </div>
            <div class="pt-5 space-y-6">
                { children }
            </div>
        </div>
    }
}

#[derive(Properties, PartialEq)]
pub struct LayoutProps {
    pub children: Children,
}

#[function_component(Layout)]
pub fn layout(props: &LayoutProps) -> Html {
    html! {
        <div class="flex h-screen bg-background">
            <div class="hidden md:flex">
                <Sidebar />
            </div>

            <div class="flex-1 flex flex-col overflow-hidden">
                <Header />
                <main class="flex-1 overflow-y-auto">
                    { for props.children.iter() }
                </main>
            </div>
        </div>
    }
}

#[hook]
fn use_notifications() -> (Vec<Notification>, usize) {
    let session = use_session();
    let notifications = use_query(cache::NOTIFICATIONS, session.clone(), |session| async move {
        let session = session.ok_or(AppError::Unauthenticated)?;
        list_notifications(&ApiClient::new(Some(&session)), session.user_id).await
    });
    let recommendations = use_query(cache::RECOMMENDATIONS, session, |session| async move {
        let session = session.ok_or(AppError::Unauthenticated)?;
        list_recommendations(&ApiClient::new(Some(&session)), session.user_id).await
    });
    let pending = recommendations
        .value()
        .iter()
        .filter(|r| r.status == RecommendationStatus::Pending)
        .count();
    (notifications.value(), pending)
}

#[function_component(Header)]
fn header() -> Html {
    let session = use_session();
    let navigator = use_navigator();
    let invalidate = use_invalidate();
    let show_notifications = use_state(|| false);
    let (notifications, pending_recommendations) = use_notifications();
    let toggle_notifications = {
        let show_notifications = show_notifications.clone();
        Callback::from(move |_| show_notifications.set(!*show_notifications))
    };

    let badge = badge_text(unread_count(&notifications) + pending_recommendations);

    let mark_one = {
        let session = session.clone();
        let invalidate = invalidate.clone();
        Callback::from(move |id: u64| {
            let client = ApiClient::new(session.as_ref());
            let invalidate = invalidate.clone();
            spawn_local(async move {
                match mark_as_read(&client, id).await {
                    Ok(()) => invalidate.emit(cache::NOTIFICATIONS),
                    Err(e) => warn!("could not mark notification {}: {}", id, e),
                }
            });
        })
    };

    let mark_all = {
        let session = session.clone();
        let invalidate = invalidate.clone();
        Callback::from(move |_| {
            let client = ApiClient::new(session.as_ref());
            let invalidate = invalidate.clone();
            spawn_local(async move {
                match mark_all_as_read(&client).await {
                    Ok(()) => invalidate.emit(cache::NOTIFICATIONS),
                    Err(e) => warn!("could not mark notifications as read: {}", e),
                }
            });
        })
    };

    let open_dashboard = {
        let show_notifications = show_notifications.clone();
        Callback::from(move |_| {
            show_notifications.set(false);
            if let Some(navigator) = navigator.as_ref() {
                navigator.push(Route::Dashboard);
            }
        })
    };

    let now = Utc::now();

    html! {
        <header class="bg-[#D8E1E8] border-b border-border h-16 flex items-center justify-between px-6">
            <div class="flex-1"></div>
            <div class="relative flex items-center gap-4">
                <button class="p-2 hover:bg-secondary rounded-full transition-colors relative" aria-label="Notificaciones" onclick={toggle_notifications}>
                    { icon_bell() }
                    if let Some(badge) = badge {
                        <span class="absolute -top-1 -right-1 min-w-[18px] h-[18px] px-1 bg-red-500 text-white text-[10px] font-bold rounded-full flex items-center justify-center">{ badge }</span>
                    }
                </button>
                if *show_notifications {
                    <div class="absolute right-0 top-12 w-80 bg-white border border-border rounded-xl shadow-lg overflow-hidden z-50">
                        <div class="px-4 py-3 border-b border-border flex items-center justify-between">
                            <h4 class="text-sm font-bold text-[#173E63]">{"Notificaciones"}</h4>
                            if unread_count(&notifications) > 0 {
                                <button class="text-xs font-bold text-[#1D617A] hover:underline" onclick={mark_all}>{"Marcar todo"}</button>
                            }
                        </div>
                        <div class="divide-y divide-border max-h-96 overflow-y-auto">
                            if pending_recommendations > 0 {
                                <button class="w-full text-left px-4 py-3 bg-[#eef4f9] hover:bg-[#dfeaf3]" onclick={open_dashboard}>
                                    <p class="text-sm font-bold text-[#173E63]">{ recommendations_headline(pending_recommendations) }</p>
                                    <p class="text-xs text-slate-500 mt-1">{"Revisa tus recomendaciones en el dashboard"}</p>
                                </button>
                            }
                            if notifications.is_empty() && pending_recommendations == 0 {
                                <p class="px-4 py-6 text-center text-sm text-slate-400">{"No hay notificaciones"}</p>
                            }
                            { for notifications.iter().map(|notification| {
                                let id = notification.id;
                                let mark_one = mark_one.clone();
                                let read = notification.read;
                                html! {
                                    <div key={id} class={classes!("px-4", "py-3", "hover:bg-slate-50", "cursor-pointer", (!read).then_some("bg-blue-50/40"))}
                                        onclick={Callback::from(move |_| if !read { mark_one.emit(id) })}>
                                        <div class="flex items-center justify-between gap-2">
                                            <p class="text-sm font-bold text-[#173E63] truncate">{ notification.title.clone() }</p>
                                            <span class="text-[10px] text-slate-400 font-bold uppercase tracking-tighter shrink-0">
                                                { time_ago(notification.created_at.as_deref(), now) }
                                            </span>
                                        </div>
                                        if let Some(subtitle) = notification.subtitle.clone() {
                                            <p class="text-xs font-medium text-slate-600">{ subtitle }</p>
                                        }
                                        <p class="text-xs text-slate-500 mt-1">{ notification.message.clone() }</p>
                                    </div>
                                }
                            }) }
                        </div>
                    </div>
                }
                if let Some(session) = session {
                    <span class="text-sm font-semibold text-[#173E63] hidden sm:inline">{ session.name }</span>
                }
            </div>
        </header>
    }
}

#[function_component(Sidebar)]
fn sidebar() -> Html {
    let navigator = use_navigator();
    let session_handle = use_context::<SessionHandle>();
    let subscription = use_subscription();
    let pathname = navigator
        .as_ref()
        .map(|n| n.current().path())
        .unwrap_or_default();
    let pathname = pathname.split('?').next().unwrap_or_default().to_string();
    let groups = menu_list(&pathname, subscription.data.clone().flatten().as_ref());

    let on_logout = {
        let navigator = navigator.clone();
        Callback::from(move |_| {
            let client = ApiClient::new(session_handle.as_ref().and_then(|h| (**h).as_ref()));
            let session_handle = session_handle.clone();
            let navigator = navigator.clone();
            spawn_local(async move {
                auth::logout(&client).await;
                clear_session();
                if let Some(handle) = session_handle {
                    handle.set(None);
                }
                if let Some(navigator) = navigator {
                    navigator.push(Route::Login);
                }
            });
        })
    };

    html! {
        <div class="w-[220px] h-screen bg-[#D8E1E8] p-4 flex flex-col">
            <div class="flex items-center gap-3 px-2 mb-8">
                <div class="w-12 h-12 bg-[#173E63] rounded-full flex items-center justify-center text-white font-black">{"F"}</div>
                <span class="text-[#173E63] text-2xl font-black tracking-tight">{"Fopy"}</span>
            </div>

            <div class="flex-1 bg-[#173E63] rounded-[24px] flex flex-col py-6 px-3 shadow-lg overflow-y-auto">
                { for groups.iter().map(|group| html! {
                    <nav class="flex-1 space-y-2">
                        <p class="px-4 text-[10px] uppercase tracking-widest text-slate-400 font-bold">{ group.label }</p>
                        { for group.menus.iter().map(|menu| {
                            let class_name = if menu.active {
                                "flex items-center gap-3 px-4 py-3 rounded-xl transition-all text-[13px] font-medium bg-[#B2CBDE] text-[#173E63] w-full"
                            } else {
                                "flex items-center gap-3 px-4 py-3 rounded-xl transition-all text-[13px] font-medium text-slate-300 hover:bg-white/5 hover:text-white w-full"
                            };
                            let navigator = navigator.clone();
                            let href = menu.href;
                            html! {
                                <button type="button" class={class_name} onclick={Callback::from(move |_| {
                                    if let Some(navigator) = navigator.as_ref() {
                                        navigator.push(Route::from_href(href));
                                    }
                                })}>
                                    <span class="shrink-0">{ menu_icon(menu.icon) }</span>
                                    <span class="truncate whitespace-nowrap text-left">{ menu.label }</span>
                                </button>
                            }
                        }) }
                    </nav>
                }) }

                <SubscriptionBadge />

                <div class="mt-auto pt-4">
                    <button onclick={on_logout} class="flex items-center gap-3 w-full px-4 py-3 rounded-xl hover:bg-white/10 transition-colors text-[13px] font-medium text-slate-300">
                        { icon_log_out() }
                        <span>{"Cerrar sesión"}</span>
                    </button>
                </div>
            </div>
        </div>
    }
}
