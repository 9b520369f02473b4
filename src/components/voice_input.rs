use std::cell::RefCell;
use std::rc::Rc;

use js_sys::Array;
use log::{error, info, warn};
use wasm_bindgen::closure::Closure;
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::{spawn_local, JsFuture};
use web_sys::{Blob, BlobEvent, BlobPropertyBag, MediaRecorder, MediaStream, MediaStreamConstraints, MediaStreamTrack};
use yew::prelude::*;

use crate::api::ApiClient;
use crate::components::icons::icon_mic;
use crate::components::toast::use_toast;
use crate::error::{AppError, AppResult};
use crate::features::voice::{resolve_outcome, send_audio, VoiceOutcome};
use crate::forms::use_active_form;
use crate::route::use_navigator;
use crate::session::use_session;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum VoiceButtonVariant {
    #[default]
    Floating,
    Inline,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum VoiceStatus {
    Idle,
    Recording,
    Processing,
}

struct Recording {
    recorder: MediaRecorder,
    stream: MediaStream,
    _on_data: Closure<dyn FnMut(BlobEvent)>,
    _on_stop: Closure<dyn FnMut(Event)>,
}

impl Recording {
    fn stop(&self) {
        if self.recorder.stop().is_err() {
            warn!("recorder was not running");
        }
        let tracks = self.stream.get_tracks();
        for track in tracks.iter() {
            if let Ok(track) = track.dyn_into::<MediaStreamTrack>() {
                track.stop();
            }
        }
    }
}

async fn open_microphone() -> AppResult<MediaStream> {
    let window = web_sys::window().ok_or_else(|| AppError::unsupported("sin ventana"))?;
    let devices = window
        .navigator()
        .media_devices()
        .map_err(|_| AppError::unsupported("El navegador no permite grabar audio"))?;
    let constraints = MediaStreamConstraints::new();
    constraints.set_audio(&JsValue::TRUE);
    let promise = devices
        .get_user_media_with_constraints(&constraints)
        .map_err(|_| AppError::unsupported("No se pudo acceder al micrófono"))?;
    let stream = JsFuture::from(promise)
        .await
        .map_err(|_| AppError::unsupported("Permiso de micrófono denegado"))?;
    stream
        .dyn_into::<MediaStream>()
        .map_err(|_| AppError::unsupported("Flujo de audio inválido"))
}

fn start_recording(stream: MediaStream, captured: UseStateHandle<Option<Blob>>) -> AppResult<Recording> {
    let recorder = MediaRecorder::new_with_media_stream(&stream)
        .map_err(|_| AppError::unsupported("MediaRecorder no disponible"))?;
    let chunks: Rc<RefCell<Vec<Blob>>> = Rc::default();

    let on_data = {
        let chunks = chunks.clone();
        Closure::<dyn FnMut(BlobEvent)>::new(move |event: BlobEvent| {
            if let Some(blob) = event.data() {
                chunks.borrow_mut().push(blob);
            }
        })
    };

    let on_stop = Closure::<dyn FnMut(Event)>::new(move |_event: Event| {
        let parts = Array::new();
        for chunk in chunks.borrow_mut().drain(..) {
            parts.push(&chunk);
        }
        let options = BlobPropertyBag::new();
        options.set_type("audio/wav");
        match Blob::new_with_blob_sequence_and_options(&parts, &options) {
            Ok(blob) => captured.set(Some(blob)),
            Err(_) => error!("could not assemble recorded audio"),
        }
    });

    recorder.set_ondataavailable(Some(on_data.as_ref().unchecked_ref()));
    recorder.set_onstop(Some(on_stop.as_ref().unchecked_ref()));
    recorder
        .start()
        .map_err(|_| AppError::unsupported("No se pudo iniciar la grabación"))?;

    Ok(Recording {
        recorder,
        stream,
        _on_data: on_data,
        _on_stop: on_stop,
    })
}

#[derive(Properties, PartialEq)]
pub struct VoiceInputButtonProps {
    #[prop_or_default]
    pub variant: VoiceButtonVariant,
    #[prop_or(true)]
    pub populate_form: bool,
}

#[function_component(VoiceInputButton)]
pub fn voice_input_button(props: &VoiceInputButtonProps) -> Html {
    let session = use_session();
    let toaster = use_toast();
    let navigator = use_navigator();
    let active_form = use_active_form();
    let status = use_state(|| VoiceStatus::Idle);
    let captured = use_state(|| None::<Blob>);
    let recording = use_mut_ref(|| None::<Recording>);

    {
        let status = status.clone();
        let toaster = toaster.clone();
        let captured_handle = captured.clone();
        let populate = props.populate_form;
        use_effect_with_deps(
            move |captured| {
                if let Some(blob) = captured.clone() {
                    captured_handle.set(None);
                    status.set(VoiceStatus::Processing);
                    let client = ApiClient::new(session.as_ref());
                    spawn_local(async move {
                        match send_audio(&client, &blob).await {
                            Ok(result) => {
                                info!("voice transcription: {}", result.transcription);
                                if let Some(toaster) = toaster.as_ref() {
                                    toaster.success("Audio procesado con éxito");
                                }
                                let mut values = active_form.as_ref().map(|form| (*form.0).clone());
                                match resolve_outcome(&result, populate, values.as_mut()) {
                                    VoiceOutcome::Populated { applied } => {
                                        if let (Some(form), Some(values)) = (active_form.as_ref(), values) {
                                            form.0.set(values);
                                        }
                                        if applied > 0 {
                                            if let Some(toaster) = toaster.as_ref() {
                                                toaster.info("Campos completados automáticamente");
                                            }
                                        }
                                    }
                                    VoiceOutcome::Navigate(route) => {
                                        if let Some(navigator) = navigator.as_ref() {
                                            navigator.push(route);
                                        }
                                    }
                                    VoiceOutcome::Nothing => {}
                                }
                            }
                            Err(e) => {
                                error!("voice command failed: {}", e);
                                if let Some(toaster) = toaster.as_ref() {
                                    toaster.error(e.user_message("Error al procesar el audio"));
                                }
                            }
                        }
                        status.set(VoiceStatus::Idle);
                    });
                }
                || ()
            },
            (*captured).clone(),
        );
    }

    let on_start = {
        let status = status.clone();
        let captured = captured.clone();
        let recording = recording.clone();
        Callback::from(move |_| {
            if *status != VoiceStatus::Idle {
                return;
            }
            let status = status.clone();
            let captured = captured.clone();
            let recording = recording.clone();
            let toaster = toaster.clone();
            spawn_local(async move {
                let started = match open_microphone().await {
                    Ok(stream) => start_recording(stream, captured),
                    Err(e) => Err(e),
                };
                match started {
                    Ok(live) => {
                        *recording.borrow_mut() = Some(live);
                        status.set(VoiceStatus::Recording);
                    }
                    Err(e) => {
                        error!("could not start recording: {}", e);
                        if let Some(toaster) = toaster.as_ref() {
                            toaster.error(e.user_message("Error al procesar el audio"));
                        }
                    }
                }
            });
        })
    };

    let on_stop = {
        let recording = recording.clone();
        Callback::from(move |_| {
            if let Some(live) = recording.borrow().as_ref() {
                live.stop();
            }
        })
    };

    let on_cancel = {
        let status = status.clone();
        Callback::from(move |_| {
            if let Some(live) = recording.borrow_mut().take() {
                live.recorder.set_onstop(None);
                live.stop();
            }
            status.set(VoiceStatus::Idle);
        })
    };

    let button_class = match props.variant {
        VoiceButtonVariant::Floating => {
            "fixed bottom-6 right-6 z-40 w-14 h-14 rounded-full bg-[#173E63] text-white shadow-lg flex items-center justify-center hover:bg-[#1D617A] transition-colors"
        }
        VoiceButtonVariant::Inline => {
            "inline-flex items-center gap-2 px-4 py-2 rounded-xl border border-border bg-card text-[#173E63] text-sm font-bold hover:bg-[#eef4f9]"
        }
    };

    html! {
        <>
            <button type="button" class={button_class} onclick={on_start} aria-label="Comando de voz"
                disabled={*status == VoiceStatus::Processing}>
                { icon_mic() }
                if props.variant == VoiceButtonVariant::Inline {
                    <span>{"Voz"}</span>
                }
            </button>
            if *status != VoiceStatus::Idle {
                <div class="fixed inset-0 z-50 bg-black/40 flex items-center justify-center">
                    <div class="bg-white rounded-2xl p-6 w-80 text-center space-y-4 shadow-xl">
                        <div class={classes!("mx-auto", "w-16", "h-16", "rounded-full", "flex", "items-center", "justify-center", "text-white",
                            if *status == VoiceStatus::Recording { "bg-red-500 animate-pulse" } else { "bg-[#173E63]" })}>
                            { icon_mic() }
                        </div>
                        if *status == VoiceStatus::Recording {
                            <p class="font-bold text-[#173E63]">{"Grabando..."}</p>
                            <p class="text-xs text-slate-500">{"Di por ejemplo: \"Gasté 25 dólares en comida hoy\""}</p>
                            <div class="flex gap-2 justify-center">
                                <button type="button" onclick={on_cancel} class="px-4 py-2 rounded-xl border border-border text-sm">{"Cancelar"}</button>
                                <button type="button" onclick={on_stop} class="px-4 py-2 rounded-xl bg-[#173E63] text-white text-sm font-bold">{"Detener"}</button>
                            </div>
                        } else {
                            <p class="font-bold text-[#173E63]">{"Procesando audio..."}</p>
                        }
                    </div>
                </div>
            }
        </>
    }
}
