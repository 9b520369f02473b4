use log::error;
use wasm_bindgen_futures::spawn_local;
use yew::prelude::*;

use crate::api::ApiClient;
use crate::cache::{self, use_invalidate, use_query};
use crate::components::feedback::{loading_block, Alert, AlertVariant, Spinner};
use crate::components::form_fields::TextField;
use crate::components::icons::icon_save;
use crate::components::layout::page_shell;
use crate::components::premium::SubscriptionStatus;
use crate::components::toast::use_toast;
use crate::features::users::{
    change_password, get_profile, password_from_form, profile_form, profile_from_form, update_profile,
    PasswordStrength, UserProfile,
};
use crate::format::format_date_str;
use crate::forms::{ActiveForm, FieldErrors, FormValues};
use crate::pages::for_user;
use crate::session::{save_session, use_session, SessionHandle};

fn save_button(label: &'static str, busy: bool) -> Html {
    html! {
        <button type="submit" disabled={busy}
            class="flex items-center gap-2 bg-[#173E63] text-white px-4 py-2 rounded-xl font-bold text-sm hover:bg-[#1D617A] disabled:opacity-50">
            if busy { <Spinner class="h-4 w-4 border-white border-t-transparent" /> } else { { icon_save() } }
            { label }
        </button>
    }
}

fn profile_header(profile: &UserProfile) -> Html {
    html! {
        <div class="bg-card rounded-[10px] p-6 border border-border flex items-center gap-4">
            <div class="h-16 w-16 rounded-full bg-[#173E63] text-white flex items-center justify-center text-xl font-black">
                { profile.initials() }
            </div>
            <div>
                <h2 class="text-lg font-bold text-foreground">{ profile.name.clone() }</h2>
                <p class="text-sm text-muted-foreground">{ profile.email.clone() }</p>
                if let Some(since) = profile.registration_date.as_deref() {
                    <p class="text-xs text-muted-foreground mt-1">{ format!("Miembro desde {}", format_date_str(since)) }</p>
                }
            </div>
        </div>
    }
}

#[function_component(ProfilePage)]
pub fn profile_page() -> Html {
    let session = use_session();
    let session_handle = use_context::<SessionHandle>();
    let toaster = use_toast();
    let invalidate = use_invalidate();
    let profile = use_query(cache::USERS, session.clone(), |session| {
        for_user(session, |client, user_id| async move { get_profile(&client, user_id).await })
    });

    let details = use_state(FormValues::new);
    let details_errors = use_state(FieldErrors::default);
    let saving = use_state(|| false);
    let password = use_state(FormValues::new);
    let password_errors = use_state(FieldErrors::default);
    let changing = use_state(|| false);

    {
        let details = details.clone();
        use_effect_with_deps(
            move |loaded: &Option<UserProfile>| {
                if let Some(loaded) = loaded {
                    details.set(profile_form(loaded));
                }
                || ()
            },
            profile.data.clone(),
        );
    }

    let Some(session) = session else {
        return loading_block();
    };

    let on_details = {
        let details = details.clone();
        let details_errors = details_errors.clone();
        let saving = saving.clone();
        let toaster = toaster.clone();
        let session = session.clone();
        Callback::from(move |e: SubmitEvent| {
            e.prevent_default();
            let update = match profile_from_form(&details) {
                Ok(update) => update,
                Err(errors) => {
                    details_errors.set(errors);
                    return;
                }
            };
            details_errors.set(FieldErrors::default());
            let client = ApiClient::new(Some(&session));
            let mut session = session.clone();
            let session_handle = session_handle.clone();
            let toaster = toaster.clone();
            let invalidate = invalidate.clone();
            let saving = saving.clone();
            saving.set(true);
            spawn_local(async move {
                let result = update_profile(&client, session.user_id, &update).await;
                saving.set(false);
                match result {
                    Ok(_) => {
                        session.name = update.name;
                        session.email = update.email;
                        save_session(&session);
                        if let Some(handle) = session_handle.as_ref() {
                            handle.set(Some(session));
                        }
                        invalidate.emit(cache::USERS);
                        if let Some(toaster) = toaster.as_ref() {
                            toaster.success("Perfil actualizado");
                        }
                    }
                    Err(e) => {
                        error!("profile update failed: {}", e);
                        if let Some(toaster) = toaster.as_ref() {
                            toaster.error(e.user_message("No se pudo actualizar el perfil"));
                        }
                    }
                }
            });
        })
    };

    let on_password = {
        let password = password.clone();
        let password_errors = password_errors.clone();
        let changing = changing.clone();
        let session = session.clone();
        Callback::from(move |e: SubmitEvent| {
            e.prevent_default();
            let update = match password_from_form(&password) {
                Ok(update) => update,
                Err(errors) => {
                    password_errors.set(errors);
                    return;
                }
            };
            password_errors.set(FieldErrors::default());
            let client = ApiClient::new(Some(&session));
            let user_id = session.user_id;
            let password = password.clone();
            let toaster = toaster.clone();
            let changing = changing.clone();
            changing.set(true);
            spawn_local(async move {
                let result = change_password(&client, user_id, &update).await;
                changing.set(false);
                match result {
                    Ok(_) => {
                        password.set(FormValues::new());
                        if let Some(toaster) = toaster.as_ref() {
                            toaster.success("Contraseña actualizada");
                        }
                    }
                    Err(e) => {
                        error!("password change failed: {}", e);
                        if let Some(toaster) = toaster.as_ref() {
                            toaster.error(e.user_message("No se pudo cambiar la contraseña"));
                        }
                    }
                }
            });
        })
    };

    let header = match (profile.data.as_ref(), profile.error.as_ref()) {
        (Some(loaded), _) => profile_header(loaded),
        (None, Some(e)) => html! {
            <Alert variant={AlertVariant::Destructive} title="No se pudo cargar tu perfil">
                { e.user_message("Intenta nuevamente más tarde.") }
            </Alert>
        },
        (None, None) => loading_block(),
    };

    let strength = PasswordStrength::of(&password.text("new_password"));

    let body = html! {
        <>
            { header }
            <div class="grid grid-cols-1 lg:grid-cols-2 gap-6">
                <ContextProvider<ActiveForm> context={ActiveForm(details.clone())}>
                    <ContextProvider<FieldErrors> context={(*details_errors).clone()}>
                        <form onsubmit={on_details} class="bg-card rounded-[10px] p-6 border border-border space-y-4">
                            <h3 class="font-bold text-foreground text-lg">{"Información personal"}</h3>
                            <TextField name="name" label="Nombre" />
                            <TextField name="username" label="Nombre de usuario" />
                            <TextField name="email" label="Correo electrónico" input_type="email" />
                            { save_button("Guardar cambios", *saving) }
                        </form>
                    </ContextProvider<FieldErrors>>
                </ContextProvider<ActiveForm>>

                <ContextProvider<ActiveForm> context={ActiveForm(password.clone())}>
                    <ContextProvider<FieldErrors> context={(*password_errors).clone()}>
                        <form onsubmit={on_password} class="bg-card rounded-[10px] p-6 border border-border space-y-4">
                            <h3 class="font-bold text-foreground text-lg">{"Cambiar contraseña"}</h3>
                            <TextField name="current_password" label="Contraseña actual" input_type="password" />
                            <TextField name="new_password" label="Nueva contraseña" input_type="password" />
                            if let Some(strength) = strength {
                                <p class={classes!("text-xs", "font-semibold", strength.text_class())}>
                                    { format!("Seguridad: {}", strength.label()) }
                                </p>
                            }
                            <TextField name="confirm_password" label="Confirmar contraseña" input_type="password" />
                            { save_button("Cambiar contraseña", *changing) }
                        </form>
                    </ContextProvider<FieldErrors>>
                </ContextProvider<ActiveForm>>
            </div>
            <SubscriptionStatus />
        </>
    };

    page_shell("Mi Perfil", html! {}, body)
}
