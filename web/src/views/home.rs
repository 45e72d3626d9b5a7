use booking_core::{
    ArenaConfig, AvailabilitySnapshot, FinalizedSelection, Session, SessionRole,
};
use leptos::prelude::*;
use thaw::*;

use crate::components::{BookingModal, CheckoutModal};
use crate::server::{fetch_slots, save_slots};
use crate::utils::{format, local_cache};

/// Landing page: arena presentation plus the agenda entry point. Owns the
/// session state and the sync actions; the modals only ever mutate the
/// session and hand snapshots back up for persistence.
#[component]
pub fn HomePage() -> impl IntoView {
    let config = ArenaConfig::default();
    let arena_name = config.arena_name.clone();
    let prices = config.price_table();
    let session = RwSignal::new(Session::new(config, SessionRole::Guest));

    let show_booking = RwSignal::new(false);
    let show_checkout = RwSignal::new(false);
    let checkout_selection = RwSignal::new(None::<FinalizedSelection>);
    let sync_error = RwSignal::new(None::<String>);
    let is_syncing = RwSignal::new(false);
    // Snapshot of a write that has not reached the backend yet; the retry
    // control re-sends it instead of fetching over it.
    let pending_persist = RwSignal::new(None::<AvailabilitySnapshot>);

    // The snapshot version at dispatch time travels with the fetch, so a
    // poll that raced a local write can be recognized and discarded.
    let refresh = Action::new(move |&issued_at: &u64| async move {
        (issued_at, fetch_slots().await)
    });

    let persist = Action::new(move |snapshot: &AvailabilitySnapshot| {
        let snapshot = snapshot.clone();
        async move { save_slots(snapshot).await }
    });

    let request_refresh = move || {
        is_syncing.set(true);
        let issued_at = session.with_untracked(|s| s.version());
        refresh.dispatch(issued_at);
    };

    // Client-side boot: last cached agenda first for instant paint, then a
    // live fetch on top of it.
    Effect::new(move |_| {
        session.update(|s| {
            s.observe_today(chrono::Local::now().date_naive());
            if let Some(cached) = local_cache::load() {
                let issued_at = s.version();
                s.apply_refresh(cached, issued_at);
            }
        });
        request_refresh();
    });

    Effect::new(move |_| {
        if let Some((issued_at, result)) = refresh.value().get() {
            is_syncing.set(false);
            match result {
                Ok(snapshot) => {
                    sync_error.set(None);
                    let mut applied = false;
                    session.update(|s| {
                        applied = s.apply_refresh(snapshot, issued_at);
                    });
                    if applied {
                        session.with_untracked(|s| local_cache::save(s.snapshot()));
                    }
                }
                Err(e) => {
                    sync_error.set(Some(format!("Não foi possível atualizar a agenda: {}", e)));
                }
            }
        }
    });

    Effect::new(move |_| {
        if let Some(result) = persist.value().get() {
            match result {
                Ok(()) => {
                    sync_error.set(None);
                    pending_persist.set(None);
                    session.update(|s| s.mark_synced());
                    session.with_untracked(|s| local_cache::save(s.snapshot()));
                }
                Err(e) => {
                    sync_error.set(Some(format!("Não foi possível salvar a reserva: {}", e)));
                }
            }
        }
    });

    let push_snapshot = move |snapshot: AvailabilitySnapshot| {
        pending_persist.set(Some(snapshot.clone()));
        persist.dispatch(snapshot);
    };

    // A failed write is retried as a write. Only fall back to a plain fetch
    // when nothing is waiting to be saved.
    let retry_sync = move || {
        if let Some(snapshot) = pending_persist.get_untracked() {
            persist.dispatch(snapshot);
        } else {
            request_refresh();
        }
    };

    let open_agenda = move |_| {
        show_booking.set(true);
        request_refresh();
    };

    let handle_checkout = move |finalized: FinalizedSelection| {
        checkout_selection.set(Some(finalized));
        show_booking.set(false);
        show_checkout.set(true);
    };

    let toggle_admin = move |_| {
        session.update(|s| {
            let next = if s.is_admin() {
                SessionRole::Guest
            } else {
                SessionRole::Admin
            };
            s.set_role(next);
        });
    };

    let hero_name = arena_name.clone();
    let footer_name = arena_name.clone();

    view! {
        <div class="homepage-container" style="max-width: 1100px; margin: 0 auto;">
            <div class="hero" style="text-align: center; padding: 4rem 2rem 2rem;">
                <h1 style="font-size: 3rem; margin-bottom: 1rem;">{hero_name}</h1>
                <p style="font-size: 1.2rem; color: #666; margin-bottom: 2rem;">
                    "Quadra de areia e área gourmet em um só lugar. Reserve seu horário online."
                </p>
                <Button
                    appearance=ButtonAppearance::Primary
                    size=ButtonSize::Large
                    on_click=open_agenda
                >
                    "VER AGENDA"
                </Button>
                <div class="sync-status" style="margin-top: 1rem; min-height: 2rem;">
                    {move || {
                        is_syncing
                            .get()
                            .then(|| view! { <span class="syncing">"Atualizando agenda..."</span> })
                    }}
                    {move || {
                        sync_error
                            .get()
                            .map(|error| {
                                view! {
                                    <span class="sync-error-pill">
                                        {error}
                                        <Button
                                            appearance=ButtonAppearance::Subtle
                                            on_click=move |_| retry_sync()
                                        >
                                            "Tentar novamente"
                                        </Button>
                                    </span>
                                }
                            })
                    }}
                </div>
            </div>

            <div class="pricing" style="display: flex; gap: 2rem; justify-content: center; padding: 2rem; flex-wrap: wrap;">
                <div class="price-card">
                    <h3>"Quadra"</h3>
                    <p>{format!("{} por hora", format::price(prices.court))}</p>
                    <p style="color: #888;">"Vôlei, futevôlei e frescobol"</p>
                </div>
                <div class="price-card">
                    <h3>"Área Gourmet"</h3>
                    <p>{format!("{} por hora", format::price(prices.gourmet))}</p>
                    <p style="color: #888;">"Churrasqueira, geladeira e som"</p>
                </div>
                <div class="price-card">
                    <h3>"Aluguel de bola"</h3>
                    <p>{format!("{} por reserva", format::price(prices.ball))}</p>
                    <p style="color: #888;">"Opcional, apenas para a quadra"</p>
                </div>
            </div>

            <div class="about" style="text-align: center; padding: 2rem;">
                <h2 style="margin-bottom: 1rem;">"Como funciona"</h2>
                <p style="color: #666; max-width: 600px; margin: 0 auto;">
                    "Escolha os horários livres na agenda, confirme o pagamento via PIX e pronto. Horários das 08:00 às 20:00, todos os dias."
                </p>
            </div>

            <footer style="text-align: center; padding: 2rem; color: #888;">
                <p>{footer_name}</p>
                <p style="font-size: 0.8rem;">
                    <button class="admin-link" on:click=toggle_admin>
                        {move || {
                            if session.with(|s| s.is_admin()) {
                                "Sair da gestão"
                            } else {
                                "Acesso restrito"
                            }
                        }}
                    </button>
                </p>
            </footer>

            <BookingModal
                show=show_booking
                session=session
                on_close=move || show_booking.set(false)
                on_checkout=handle_checkout
                on_admin_edit=push_snapshot
            />

            <CheckoutModal
                show=show_checkout
                session=session
                selection=checkout_selection
                on_close=move || show_checkout.set(false)
                on_confirmed=push_snapshot
            />
        </div>
    }
}
