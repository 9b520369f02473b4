use log::error;
use wasm_bindgen_futures::spawn_local;
use yew::prelude::*;

use crate::api::ApiClient;
use crate::components::form_fields::TextField;
use crate::components::toast::use_toast;
use crate::error::AppResult;
use crate::features::auth::{
    forgot_password, login, login_from_form, register, register_from_form, reset_from_form,
    reset_password, ForgotPasswordRequest,
};
use crate::features::users::looks_like_email;
use crate::forms::{ActiveForm, FieldErrors, FormValues};
use crate::route::{use_navigator, Navigator, Route};
use crate::session::{save_session, Session, SessionHandle};

#[derive(Properties, PartialEq)]
struct AuthCardProps {
    title: AttrValue,
    subtitle: AttrValue,
    values: UseStateHandle<FormValues>,
    errors: FieldErrors,
    failure: Option<String>,
    loading: bool,
    submit_label: AttrValue,
    on_submit: Callback<()>,
    #[prop_or_default]
    footer: Html,
    #[prop_or_default]
    children: Children,
}

#[function_component(AuthCard)]
fn auth_card(props: &AuthCardProps) -> Html {
    let onsubmit = {
        let on_submit = props.on_submit.clone();
        Callback::from(move |e: SubmitEvent| {
            e.prevent_default();
            on_submit.emit(());
        })
    };

    html! {
        <div class="min-h-screen flex items-center justify-center bg-background p-4">
            <div class="w-full max-w-md bg-card border border-border rounded-2xl shadow-lg p-8">
                <div class="text-center mb-6">
                    <h1 class="text-2xl font-bold text-foreground">{ props.title.clone() }</h1>
                    <p class="text-sm text-muted-foreground mt-2">{ props.subtitle.clone() }</p>
                </div>
                <ContextProvider<ActiveForm> context={ActiveForm(props.values.clone())}>
                    <ContextProvider<FieldErrors> context={props.errors.clone()}>
                        <form class="space-y-4" {onsubmit}>
                            { for props.children.iter() }
                            if let Some(msg) = props.failure.as_ref() {
                                <div class="text-sm text-red-500">{ msg.clone() }</div>
                            }
                            <button type="submit" disabled={props.loading}
                                class="w-full bg-[#173E63] text-white py-2 rounded-lg font-semibold hover:opacity-90 transition-opacity disabled:opacity-50">
                                { if props.loading { AttrValue::from("Espera...") } else { props.submit_label.clone() } }
                            </button>
                        </form>
                    </ContextProvider<FieldErrors>>
                </ContextProvider<ActiveForm>>
                <div class="mt-6 text-center text-sm text-muted-foreground">{ props.footer.clone() }</div>
            </div>
        </div>
    }
}

fn link(label: &'static str, route: Route, navigator: Option<Navigator>) -> Html {
    let onclick = Callback::from(move |_| {
        if let Some(navigator) = navigator.as_ref() {
            navigator.push(route.clone());
        }
    });
    html! { <button type="button" class="ml-1 text-[#173E63] font-semibold" {onclick}>{ label }</button> }
}

#[hook]
fn use_sign_in() -> Callback<Session> {
    let handle = use_context::<SessionHandle>();
    let navigator = use_navigator();
    Callback::from(move |session: Session| {
        save_session(&session);
        if let Some(handle) = handle.as_ref() {
            handle.set(Some(session));
        }
        if let Some(navigator) = navigator.as_ref() {
            navigator.push(Route::Dashboard);
        }
    })
}

fn run_auth<F>(loading: UseStateHandle<bool>, failure: UseStateHandle<Option<String>>, fallback: &'static str, action: F, done: Callback<Session>)
where
    F: std::future::Future<Output = AppResult<Session>> + 'static,
{
    loading.set(true);
    failure.set(None);
    spawn_local(async move {
        let result = action.await;
        loading.set(false);
        match result {
            Ok(session) => done.emit(session),
            Err(e) => {
                error!("authentication failed: {}", e);
                failure.set(Some(e.user_message(fallback)));
            }
        }
    });
}

#[function_component(LoginPage)]
pub fn login_page() -> Html {
    let values = use_state(FormValues::new);
    let errors = use_state(FieldErrors::default);
    let failure = use_state(|| None::<String>);
    let loading = use_state(|| false);
    let sign_in = use_sign_in();
    let navigator = use_navigator();

    let on_submit = {
        let values = values.clone();
        let errors = errors.clone();
        let failure = failure.clone();
        let loading = loading.clone();
        Callback::from(move |_| {
            let request = match login_from_form(&values) {
                Ok(request) => request,
                Err(field_errors) => {
                    errors.set(field_errors);
                    return;
                }
            };
            errors.set(FieldErrors::default());
            let action = async move { login(&ApiClient::anonymous(), &request).await };
            run_auth(loading.clone(), failure.clone(), "Credenciales inválidas", action, sign_in.clone());
        })
    };

    let footer = html! {
        <>
            <p>
                {"¿No tienes cuenta?"}
                { link("Regístrate", Route::Register, navigator.clone()) }
            </p>
            <p class="mt-2">{ link("¿Olvidaste tu contraseña?", Route::ForgotPassword, navigator) }</p>
        </>
    };

    html! {
        <AuthCard title="Bienvenido de nuevo" subtitle="Inicia sesión para continuar." values={values.clone()}
            errors={(*errors).clone()} failure={(*failure).clone()} loading={*loading}
            submit_label="Iniciar sesión" {on_submit} {footer}>
            <TextField name="email" label="Correo electrónico" input_type="email" />
            <TextField name="password" label="Contraseña" input_type="password" />
        </AuthCard>
    }
}

#[function_component(RegisterPage)]
pub fn register_page() -> Html {
    let values = use_state(FormValues::new);
    let errors = use_state(FieldErrors::default);
    let failure = use_state(|| None::<String>);
    let loading = use_state(|| false);
    let sign_in = use_sign_in();
    let navigator = use_navigator();

    let on_submit = {
        let values = values.clone();
        let errors = errors.clone();
        let failure = failure.clone();
        let loading = loading.clone();
        Callback::from(move |_| {
            let request = match register_from_form(&values) {
                Ok(request) => request,
                Err(field_errors) => {
                    errors.set(field_errors);
                    return;
                }
            };
            errors.set(FieldErrors::default());
            let action = async move { register(&ApiClient::anonymous(), &request).await };
            run_auth(loading.clone(), failure.clone(), "No se pudo crear la cuenta", action, sign_in.clone());
        })
    };

    let footer = html! {
        <p>
            {"¿Ya tienes cuenta?"}
            { link("Inicia sesión", Route::Login, navigator) }
        </p>
    };

    html! {
        <AuthCard title="Crea tu cuenta" subtitle="Empieza a administrar tus finanzas." values={values.clone()}
            errors={(*errors).clone()} failure={(*failure).clone()} loading={*loading}
            submit_label="Registrarse" {on_submit} {footer}>
            <TextField name="name" label="Nombre" />
            <TextField name="username" label="Nombre de usuario" />
            <TextField name="email" label="Correo electrónico" input_type="email" />
            <TextField name="password" label="Contraseña" input_type="password" />
            <TextField name="password_confirmation" label="Confirmar contraseña" input_type="password" />
        </AuthCard>
    }
}

fn run_message<F>(loading: UseStateHandle<bool>, failure: UseStateHandle<Option<String>>, fallback: &'static str, action: F, done: Callback<String>)
where
    F: std::future::Future<Output = AppResult<String>> + 'static,
{
    loading.set(true);
    failure.set(None);
    spawn_local(async move {
        let result = action.await;
        loading.set(false);
        match result {
            Ok(message) => done.emit(message),
            Err(e) => {
                error!("password reset step failed: {}", e);
                failure.set(Some(e.user_message(fallback)));
            }
        }
    });
}

#[function_component(ForgotPasswordPage)]
pub fn forgot_password_page() -> Html {
    let values = use_state(FormValues::new);
    let errors = use_state(FieldErrors::default);
    let failure = use_state(|| None::<String>);
    let loading = use_state(|| false);
    let sent = use_state(|| None::<String>);
    let navigator = use_navigator();

    let on_submit = {
        let values = values.clone();
        let errors = errors.clone();
        let failure = failure.clone();
        let loading = loading.clone();
        let sent = sent.clone();
        Callback::from(move |_| {
            let mut field_errors = FieldErrors::default();
            let email = values.require_text("email", "El correo es requerido", &mut field_errors);
            if matches!(&email, Some(email) if !looks_like_email(email)) {
                field_errors.add("email", "Ingresa un correo electrónico válido");
            }
            let Some(email) = email.filter(|_| field_errors.is_empty()) else {
                errors.set(field_errors);
                return;
            };
            errors.set(FieldErrors::default());
            let request = ForgotPasswordRequest { email };
            let action = async move { forgot_password(&ApiClient::anonymous(), &request).await };
            let sent = sent.clone();
            let done = Callback::from(move |message: String| {
                sent.set(Some(if message.is_empty() {
                    "Si el correo existe, recibirás un enlace para restablecer tu contraseña.".to_string()
                } else {
                    message
                }))
            });
            run_message(loading.clone(), failure.clone(), "No se pudo enviar el correo", action, done);
        })
    };

    let footer = html! { <p>{ link("Volver a iniciar sesión", Route::Login, navigator) }</p> };

    html! {
        <AuthCard title="Recupera tu contraseña" subtitle="Te enviaremos un enlace a tu correo." values={values.clone()}
            errors={(*errors).clone()} failure={(*failure).clone()} loading={*loading}
            submit_label="Enviar enlace" {on_submit} {footer}>
            if let Some(message) = (*sent).clone() {
                <div class="text-sm text-green-600 bg-green-50 rounded-lg p-3">{ message }</div>
            }
            <TextField name="email" label="Correo electrónico" input_type="email" />
        </AuthCard>
    }
}

#[derive(Properties, PartialEq)]
pub struct ResetPasswordPageProps {
    #[prop_or_default]
    pub token: Option<String>,
}

#[function_component(ResetPasswordPage)]
pub fn reset_password_page(props: &ResetPasswordPageProps) -> Html {
    let values = use_state(FormValues::new);
    let errors = use_state(FieldErrors::default);
    let failure = use_state(|| None::<String>);
    let loading = use_state(|| false);
    let navigator = use_navigator();
    let toaster = use_toast();

    let on_submit = {
        let values = values.clone();
        let errors = errors.clone();
        let failure = failure.clone();
        let loading = loading.clone();
        let token = props.token.clone();
        let navigator = navigator.clone();
        Callback::from(move |_| {
            let request = match reset_from_form(&values, token.as_deref()) {
                Ok(request) => request,
                Err(field_errors) => {
                    if let Some(message) = field_errors.get("token") {
                        failure.set(Some(message.to_string()));
                    }
                    errors.set(field_errors);
                    return;
                }
            };
            errors.set(FieldErrors::default());
            let action = async move { reset_password(&ApiClient::anonymous(), &request).await };
            let navigator = navigator.clone();
            let toaster = toaster.clone();
            let done = Callback::from(move |message: String| {
                if let Some(toaster) = toaster.as_ref() {
                    toaster.success(if message.is_empty() { "Contraseña actualizada".to_string() } else { message });
                }
                if let Some(navigator) = navigator.as_ref() {
                    navigator.push(Route::Login);
                }
            });
            run_message(loading.clone(), failure.clone(), "No se pudo restablecer la contraseña", action, done);
        })
    };

    let footer = html! { <p>{ link("Volver a iniciar sesión", Route::Login, navigator) }</p> };

    html! {
        <AuthCard title="Nueva contraseña" subtitle="Elige una contraseña segura." values={values.clone()}
            errors={(*errors).clone()} failure={(*failure).clone()} loading={*loading}
            submit_label="Restablecer contraseña" {on_submit} {footer}>
            <TextField name="password" label="Contraseña" input_type="password" />
            <TextField name="password_confirmation" label="Confirmar contraseña" input_type="password" />
        </AuthCard>
    }
}
