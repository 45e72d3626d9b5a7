use booking_core::{
    AvailabilitySnapshot, BookingRequest, FinalizedSelection, ResourceType, Session, Sport,
};
use leptos::prelude::*;
use thaw::*;

use crate::utils::format;

const PIX_KEY: &str = "arenapenaareia@pix.com.br";

/// Checkout flow for a finalized selection: contact details and sport on
/// step 1, the PIX key plus priced summary on step 2, confirmation on
/// step 3. Confirming marks the slots occupied and hands the resulting
/// snapshot to the caller for persistence.
#[component]
pub fn CheckoutModal(
    show: RwSignal<bool>,
    session: RwSignal<Session>,
    selection: RwSignal<Option<FinalizedSelection>>,
    on_close: impl Fn() + 'static + Copy + Send + Sync,
    on_confirmed: impl Fn(AvailabilitySnapshot) + 'static + Copy + Send + Sync,
) -> impl IntoView {
    let prices = session.with_untracked(|s| s.config().price_table());

    // Form state
    let customer_name = RwSignal::new(String::new());
    let customer_phone = RwSignal::new(String::new());
    let sport = RwSignal::new(Sport::Volei);
    let include_ball = RwSignal::new(false);

    // UI state
    let current_step = RwSignal::new(1); // 1: details, 2: pix payment, 3: done
    let form_error = RwSignal::new(None::<String>);

    let request = Memo::new(move |_| {
        selection.get().and_then(|finalized| {
            BookingRequest::build(&finalized, &prices, sport.get(), include_ball.get()).ok()
        })
    });

    let has_court_slots = Memo::new(move |_| {
        selection
            .get()
            .is_some_and(|finalized| !finalized.court_slots.is_empty())
    });

    let is_form_valid = move || {
        !customer_name.get().trim().is_empty() && !customer_phone.get().trim().is_empty()
    };

    let handle_advance = move || {
        if !is_form_valid() {
            form_error.set(Some("Preencha nome e telefone para continuar.".to_string()));
            return;
        }
        form_error.set(None);
        current_step.set(2);
    };

    let handle_paid = move || {
        let Some(req) = request.get_untracked() else {
            return;
        };
        let mut persisted = None;
        session.update(|s| {
            persisted = Some(s.confirm(&req));
        });
        if let Some(snapshot) = persisted {
            on_confirmed(snapshot);
        }
        current_step.set(3);
    };

    let reset_form = move || {
        customer_name.set(String::new());
        customer_phone.set(String::new());
        sport.set(Sport::Volei);
        include_ball.set(false);
        current_step.set(1);
        form_error.set(None);
    };

    let close_modal = move || {
        reset_form();
        selection.set(None);
        on_close();
    };

    let sport_button = move |option: Sport| {
        view! {
            <Button
                appearance=Signal::derive(move || {
                    if sport.get() == option {
                        ButtonAppearance::Primary
                    } else {
                        ButtonAppearance::Secondary
                    }
                })
                on_click=move |_| sport.set(option)
            >
                {option.label()}
            </Button>
        }
    };

    let summary = move || {
        request
            .get()
            .map(|req| {
                let days = req
                    .days
                    .iter()
                    .map(|group| {
                        let lines = group
                            .items
                            .iter()
                            .map(|item| {
                                let unit = match item.resource {
                                    ResourceType::Court => prices.court,
                                    ResourceType::Gourmet => prices.gourmet,
                                };
                                view! {
                                    <div class="summary-line">
                                        <span>{format!(
                                            "{} · {}",
                                            item.key.hour(),
                                            item.resource.label()
                                        )}</span>
                                        <span>{format::price(unit)}</span>
                                    </div>
                                }
                            })
                            .collect::<Vec<_>>();
                        view! {
                            <div class="summary-day">
                                <h4>{format!(
                                    "{}, {}",
                                    format::weekday_short(group.date),
                                    format::day_short(group.date)
                                )}</h4>
                                {lines}
                            </div>
                        }
                    })
                    .collect::<Vec<_>>();
                view! {
                    <div class="booking-summary">
                        {days}
                        {req.include_ball
                            .then(|| {
                                view! {
                                    <div class="summary-line ball-fee">
                                        <span>"Aluguel de bola"</span>
                                        <span>{format::price(prices.ball)}</span>
                                    </div>
                                }
                            })}
                        <div class="summary-total">
                            <span>"Total"</span>
                            <span>{format::price(req.total)}</span>
                        </div>
                    </div>
                }
            })
    };

    view! {
        <div class=move || if show.get() { "checkout-modal-overlay show" } else { "checkout-modal-overlay" }>
            <div class="checkout-modal">
                <div class="modal-header">
                    <h2>{move || match current_step.get() {
                        1 => "Finalizar Reserva".to_string(),
                        2 => "Pagamento via PIX".to_string(),
                        3 => "Reserva Confirmada!".to_string(),
                        _ => "Reserva".to_string(),
                    }}</h2>
                    <Button
                        appearance=ButtonAppearance::Subtle
                        on_click=move |_| close_modal()
                        class="close-button"
                    >
                        "×"
                    </Button>
                </div>

                <div class="modal-content">
                    {move || match current_step.get() {
                        1 => view! {
                            <div class="checkout-form">
                                <form on:submit=move |ev| {
                                    ev.prevent_default();
                                    handle_advance();
                                }>
                                    <div class="form-section">
                                        <h4>"Seus dados"</h4>
                                        <div class="form-group">
                                            <label for="customer-name">"Nome *"</label>
                                            <Input
                                                id="customer-name"
                                                placeholder="Seu nome completo"
                                                value=customer_name
                                            />
                                        </div>
                                        <div class="form-group">
                                            <label for="customer-phone">"WhatsApp *"</label>
                                            <Input
                                                id="customer-phone"
                                                input_type=InputType::Tel
                                                placeholder="(31) 99999-9999"
                                                value=customer_phone
                                            />
                                        </div>
                                    </div>

                                    <div class="form-section">
                                        <h4>"Esporte"</h4>
                                        <div class="sport-switch">
                                            {sport_button(Sport::Volei)}
                                            {sport_button(Sport::Futevolei)}
                                            {sport_button(Sport::Frescobol)}
                                        </div>
                                        {move || {
                                            has_court_slots.get().then(|| {
                                                view! {
                                                    <div class="form-group ball-option">
                                                        <Checkbox
                                                            checked=include_ball
                                                            label=format!(
                                                                "Aluguel de bola ({})",
                                                                format::price(prices.ball)
                                                            )
                                                        />
                                                    </div>
                                                }
                                            })
                                        }}
                                    </div>

                                    {summary}

                                    {move || {
                                        form_error
                                            .get()
                                            .map(|error| {
                                                view! { <div class="form-error">{error}</div> }
                                            })
                                    }}

                                    <Button
                                        appearance=ButtonAppearance::Primary
                                        button_type=ButtonType::Submit
                                        class="checkout-submit"
                                    >
                                        "IR PARA PAGAMENTO"
                                    </Button>
                                </form>
                            </div>
                        }
                        .into_any(),
                        2 => view! {
                            <div class="payment-step">
                                <p>"Pague com a chave PIX abaixo e toque em confirmar."</p>
                                <div class="pix-key-box">
                                    <code>{PIX_KEY}</code>
                                </div>
                                {summary}
                                <div class="payment-actions">
                                    <Button
                                        appearance=ButtonAppearance::Secondary
                                        on_click=move |_| current_step.set(1)
                                    >
                                        "Voltar"
                                    </Button>
                                    <Button
                                        appearance=ButtonAppearance::Primary
                                        on_click=move |_| handle_paid()
                                    >
                                        "JÁ PAGUEI"
                                    </Button>
                                </div>
                            </div>
                        }
                        .into_any(),
                        _ => view! {
                            <div class="confirmation-step">
                                <div class="success-icon">"✓"</div>
                                <p>
                                    {move || {
                                        format!(
                                            "Obrigado, {}! Seus horários estão garantidos.",
                                            customer_name.get().trim()
                                        )
                                    }}
                                </p>
                                <p class="next-steps">
                                    "Enviaremos a confirmação pelo WhatsApp informado. Qualquer dúvida, fale com a gente na arena."
                                </p>
                                <Button
                                    appearance=ButtonAppearance::Primary
                                    on_click=move |_| close_modal()
                                >
                                    "Fechar"
                                </Button>
                            </div>
                        }
                        .into_any(),
                    }}
                </div>
            </div>
        </div>
    }
}
