use crate::api::HttpFetcher;
use crate::backend::{
    Backend, BackendKind, BrowserSlot, LocalStorageBackend, MemoryStore, NoopBackend,
    RemoteBackend, RemoteSource, SimulatedBackend,
};
use crate::components::ui::{
    Button, ButtonSize, ButtonVariant, Card, CardContent, CardDescription, CardHeader, CardItem,
    CardList, CardTitle, ErrorAlert, Input, Spinner,
};
use crate::config::AppConfig;
use crate::models::Item;
use crate::state::{ItemListController, ListState};
use leptos::prelude::*;
use leptos::task::spawn_local;
use leptos_router::hooks::use_params_map;
use std::str::FromStr;
use strum::IntoEnumIterator;

#[component]
pub fn HomePage() -> impl IntoView {
    view! {
        <div class="mx-auto w-full max-w-xl px-4 py-10">
            <h1 class="mb-6 text-lg font-semibold">"Item lists"</h1>
            <div class="flex flex-col gap-3">
                {BackendKind::iter()
                    .map(|kind| {
                        view! {
                            <a href=format!("/{kind}") class="block">
                                <Card class="py-4 transition-colors hover:bg-accent/40">
                                    <CardHeader class="px-4">
                                        <CardTitle class="text-sm">{kind.title()}</CardTitle>
                                        <CardDescription class="text-xs">{kind.description()}</CardDescription>
                                    </CardHeader>
                                </Card>
                            </a>
                        }
                    })
                    .collect_view()}
            </div>
        </div>
    }
}

/// `/:variant`: one list page per [`BackendKind`].
#[component]
pub fn VariantPage() -> impl IntoView {
    let params = use_params_map();
    let config = expect_context::<AppConfig>();

    move || {
        let slug = params.read().get("variant").unwrap_or_default();
        match BackendKind::from_str(&slug) {
            Ok(kind) => variant_view(kind, &config),
            Err(_) => view! {
                <div class="px-4 py-8 text-xs text-muted-foreground">"Not found"</div>
            }
            .into_any(),
        }
    }
}

fn variant_view(kind: BackendKind, config: &AppConfig) -> AnyView {
    match kind {
        BackendKind::Memory => {
            let controller = ItemListController::new(NoopBackend);
            view! { <ItemListView kind=kind controller=controller /> }.into_any()
        }
        BackendKind::Latency => {
            let backend = SimulatedBackend::new(MemoryStore::new(), config.latency());
            let controller = ItemListController::new(backend);
            view! { <ItemListView kind=kind controller=controller /> }.into_any()
        }
        BackendKind::Local => {
            let backend =
                LocalStorageBackend::new(BrowserSlot, config.storage_key.clone(), config.latency());
            let controller = ItemListController::new(backend);
            view! { <ItemListView kind=kind controller=controller /> }.into_any()
        }
        BackendKind::Todos => {
            let backend =
                RemoteBackend::new(HttpFetcher::new(), RemoteSource::Todos, config.todos_url.clone());
            let controller = ItemListController::new(backend);
            view! { <ItemListView kind=kind controller=controller /> }.into_any()
        }
        BackendKind::Users => {
            let backend =
                RemoteBackend::new(HttpFetcher::new(), RemoteSource::Users, config.users_url.clone());
            let controller = ItemListController::new(backend);
            view! { <ItemListView kind=kind controller=controller /> }.into_any()
        }
    }
}

/// The list UI, identical for every backend.
///
/// Renders from a signal that the controller's observer keeps current. All
/// triggers are disabled while a backend call is pending.
#[component]
pub fn ItemListView<B: Backend + 'static>(
    kind: BackendKind,
    controller: ItemListController<B>,
) -> impl IntoView {
    let snapshot: RwSignal<ListState> = RwSignal::new(controller.snapshot());
    let input: RwSignal<String> = RwSignal::new(String::new());

    controller.set_observer(move |s: &ListState| {
        if input.get_untracked() != s.input {
            input.set(s.input.clone());
        }
        snapshot.set(s.clone());
    });

    // The controller holds `Rc`s, so it lives in local (non-Send) storage.
    let controller = StoredValue::new_local(controller);

    Effect::new(move |_| {
        let text = input.get();
        controller.with_value(|c| c.set_input(text));
    });

    let load = move || {
        let c = controller.get_value();
        spawn_local(async move {
            let _ = c.load().await;
        });
    };

    // Initial load, once per mount.
    load();

    on_cleanup(move || {
        controller.try_with_value(|c| c.detach());
    });

    let busy = move || snapshot.with(|s| s.is_busy());
    let loading = move || snapshot.with(|s| s.is_loading());
    let editing = move || snapshot.with(|s| s.is_editing());

    let submit = move || {
        let text = input.get_untracked();
        let c = controller.get_value();
        spawn_local(async move {
            let _ = c.submit(&text).await;
        });
    };
    let on_enter = Callback::new(move |_| submit());

    let error = Signal::derive(move || snapshot.with(|s| s.error.as_ref().map(|e| e.to_string())));

    view! {
        <div class="mx-auto w-full max-w-xl px-4 py-10">
            <div class="mb-4">
                <a href="/" class="text-xs text-muted-foreground hover:underline">"← All lists"</a>
            </div>

            <Card>
                <CardHeader>
                    <div class="flex w-full items-center justify-between gap-2">
                        <CardTitle class="text-lg">{kind.title()}</CardTitle>
                        <Show when=busy fallback=|| ().into_view()>
                            <Spinner />
                        </Show>
                    </div>
                    <CardDescription class="text-xs">{kind.description()}</CardDescription>
                </CardHeader>

                <CardContent class="flex flex-col gap-3">
                    <div class="flex items-center gap-2">
                        <Input
                            id="item-input"
                            placeholder="Enter item"
                            bind_value=input
                            disabled=Signal::derive(busy)
                            on_enter=on_enter
                            class="h-8 text-sm"
                        />
                        <Button
                            size=ButtonSize::Sm
                            attr:disabled=busy
                            on:click=move |_| submit()
                        >
                            {move || if editing() { "Update" } else { "Add" }}
                        </Button>
                        <Show when=editing fallback=|| ().into_view()>
                            <Button
                                variant=ButtonVariant::Ghost
                                size=ButtonSize::Sm
                                attr:disabled=busy
                                on:click=move |_| controller.with_value(|c| c.cancel_edit())
                            >
                                "Cancel"
                            </Button>
                        </Show>
                    </div>

                    <ErrorAlert message=error />

                    <Show
                        when=move || snapshot.with(|s| !s.items.is_empty())
                        fallback=move || {
                            view! {
                                <p class="py-4 text-center text-xs text-muted-foreground">
                                    {move || if loading() { "Loading..." } else { "No items yet. Add some!" }}
                                </p>
                            }
                        }
                    >
                        <CardList>
                            <For
                                each=move || snapshot.with(|s| s.items.clone())
                                key=|item: &Item| (item.id, item.text.clone())
                                children=move |item: Item| {
                                    view! { <ItemRow item=item snapshot=snapshot controller=controller /> }
                                }
                            />
                        </CardList>
                    </Show>

                    <div class="flex items-center justify-between">
                        <span class="text-xs text-muted-foreground">
                            {move || {
                                if kind.is_read_only_remote() {
                                    "Changes are not sent to the server. Reload restores its list."
                                } else {
                                    ""
                                }
                            }}
                        </span>
                        <Button
                            variant=ButtonVariant::Outline
                            size=ButtonSize::Sm
                            attr:disabled=busy
                            on:click=move |_| load()
                        >
                            "Reload"
                        </Button>
                    </div>
                </CardContent>
            </Card>
        </div>
    }
}

#[component]
fn ItemRow<B: Backend + 'static>(
    item: Item,
    snapshot: RwSignal<ListState>,
    controller: StoredValue<ItemListController<B>, LocalStorage>,
) -> impl IntoView {
    let id = item.id;
    let busy = move || snapshot.with(|s| s.is_busy());
    let is_target = move || snapshot.with(|s| s.editing_id == Some(id));

    let on_delete = move |_: web_sys::MouseEvent| {
        let c = controller.get_value();
        spawn_local(async move {
            let _ = c.delete(id).await;
        });
    };

    view! {
        <CardItem>
            <span class="min-w-0 truncate">{item.text}</span>
            <div class="flex shrink-0 items-center gap-1">
                <Show when=is_target fallback=|| ().into_view()>
                    <span class="text-[10px] uppercase text-muted-foreground">"editing"</span>
                </Show>
                <Button
                    variant=ButtonVariant::Ghost
                    size=ButtonSize::Icon
                    class="h-7 w-7"
                    attr:title="Edit"
                    attr:disabled=busy
                    on:click=move |_| controller.with_value(|c| c.begin_edit(id))
                >
                    <svg
                        xmlns="http://www.w3.org/2000/svg"
                        width="16"
                        height="16"
                        viewBox="0 0 24 24"
                        fill="none"
                        stroke="currentColor"
                        stroke-width="2"
                        stroke-linecap="round"
                        stroke-linejoin="round"
                        class="text-muted-foreground"
                        aria-hidden="true"
                    >
                        <path d="M12 20h9" />
                        <path d="M16.5 3.5a2.121 2.121 0 0 1 3 3L7 19l-4 1 1-4Z" />
                    </svg>
                </Button>
                <Button
                    variant=ButtonVariant::Ghost
                    size=ButtonSize::Icon
                    class="h-7 w-7 text-destructive"
                    attr:title="Delete"
                    attr:disabled=busy
                    on:click=on_delete
                >
                    <svg
                        xmlns="http://www.w3.org/2000/svg"
                        width="16"
                        height="16"
                        viewBox="0 0 24 24"
                        fill="none"
                        stroke="currentColor"
                        stroke-width="2"
                        stroke-linecap="round"
                        stroke-linejoin="round"
                        aria-hidden="true"
                    >
                        <path d="M3 6h18" />
                        <path d="M19 6v14a2 2 0 0 1-2 2H7a2 2 0 0 1-2-2V6" />
                        <path d="M8 6V4a2 2 0 0 1 2-2h4a2 2 0 0 1 2 2v2" />
                    </svg>
                </Button>
            </div>
        </CardItem>
    }
}
