use booking_core::calendar::{
    self, clamp_to_bounds, shift_month, shift_week, start_of_week, week_window,
};
use booking_core::{AvailabilitySnapshot, FinalizedSelection, ResourceType, Session, SlotKey};
use chrono::{Datelike, NaiveDate};
use leptos::prelude::*;
use thaw::*;

use crate::utils::format;

/// Full-screen agenda: a 7-day week grid of hour slots per resource type,
/// with a month picker overlay for jumping weeks. Guests build a tentative
/// selection; admins flip occupancy directly, slot by slot.
#[component]
pub fn BookingModal(
    show: RwSignal<bool>,
    session: RwSignal<Session>,
    on_close: impl Fn() + 'static + Copy + Send + Sync,
    on_checkout: impl Fn(FinalizedSelection) + 'static + Copy + Send + Sync,
    on_admin_edit: impl Fn(AvailabilitySnapshot) + 'static + Copy + Send + Sync,
) -> impl IntoView {
    let (arena_name, hours, bounds, prices) = session.with_untracked(|s| {
        let config = s.config();
        (
            config.arena_name.clone(),
            config.hours.clone(),
            config.navigation_bounds(),
            config.price_table(),
        )
    });

    let week_start = RwSignal::new(start_of_week(bounds.lower));
    let show_date_picker = RwSignal::new(false);
    let picker_year = RwSignal::new(bounds.lower.year());
    let picker_month = RwSignal::new(bounds.lower.month());
    let conflict_notice = RwSignal::new(None::<String>);

    // Reset the working state every time the agenda opens.
    Effect::new(move |_| {
        if show.get() {
            week_start.set(start_of_week(bounds.lower));
            picker_year.set(bounds.lower.year());
            picker_month.set(bounds.lower.month());
            show_date_picker.set(false);
            conflict_notice.set(None);
            session.update(|s| s.clear_selection());
        }
    });

    let week_days = Memo::new(move |_| week_window(week_start.get()));
    let is_admin = Memo::new(move |_| session.with(|s| s.is_admin()));
    let resource = Memo::new(move |_| session.with(|s| s.resource()));

    let selection_count = Memo::new(move |_| {
        session.with(|s| {
            s.tracker().selected(ResourceType::Court).len()
                + s.tracker().selected(ResourceType::Gourmet).len()
        })
    });
    let selection_subtotal = Memo::new(move |_| {
        session.with(|s| {
            s.tracker().selected(ResourceType::Court).len() as u32 * prices.court
                + s.tracker().selected(ResourceType::Gourmet).len() as u32 * prices.gourmet
        })
    });

    let navigate_month = move |direction: i32| {
        let (year, month) = shift_month(picker_year.get(), picker_month.get(), direction);
        picker_year.set(year);
        picker_month.set(month);
    };

    let select_day = move |day: u32| {
        let Some(date) = NaiveDate::from_ymd_opt(picker_year.get(), picker_month.get(), day)
        else {
            return;
        };
        week_start.set(clamp_to_bounds(start_of_week(date), &bounds));
        show_date_picker.set(false);
    };

    let handle_confirm = move || {
        let finalized = session.with_untracked(|s| s.finalize());
        match finalized {
            Ok(selection) if !selection.is_empty() => {
                conflict_notice.set(None);
                on_checkout(selection);
            }
            Ok(_) => {}
            Err(conflict) => {
                session.update(|s| {
                    s.prune_stale();
                });
                conflict_notice.set(Some(format!(
                    "{} horário(s) acabaram de ser reservados por outra pessoa e foram removidos da sua seleção.",
                    conflict.stale.len()
                )));
            }
        }
    };

    let close_modal = move || {
        session.update(|s| s.clear_selection());
        on_close();
    };

    view! {
        <div class=move || if show.get() { "booking-modal show" } else { "booking-modal" }>
            <div class=move || if is_admin.get() { "modal-header admin" } else { "modal-header" }>
                <div class="modal-title">
                    <h2>{arena_name.clone()}</h2>
                    <p class="week-label">
                        {move || {
                            let days = week_days.get();
                            format::week_label(days[0], days[6])
                        }}
                    </p>
                </div>
                <Button
                    appearance=ButtonAppearance::Subtle
                    on_click=move |_| week_start.update(|start| *start = shift_week(*start, -1, &bounds))
                >
                    "‹"
                </Button>
                <Button
                    appearance=ButtonAppearance::Subtle
                    on_click=move |_| week_start.update(|start| *start = shift_week(*start, 1, &bounds))
                >
                    "›"
                </Button>
                <Button
                    appearance=ButtonAppearance::Subtle
                    on_click=move |_| show_date_picker.update(|open| *open = !*open)
                >
                    "Alterar Semana"
                </Button>
                <Button
                    appearance=ButtonAppearance::Subtle
                    on_click=move |_| close_modal()
                    class="close-button"
                >
                    "×"
                </Button>
            </div>

            {move || {
                if show_date_picker.get() {
                    let year = picker_year.get();
                    let month = picker_month.get();
                    let Some(grid) = calendar::month_grid(year, month) else {
                        return view! {}.into_any();
                    };
                    view! {
                        <div class="date-picker-overlay">
                            <div class="date-picker-header">
                                <h3>{format!("{} {}", format::month_name(month), year)}</h3>
                                <Button
                                    appearance=ButtonAppearance::Subtle
                                    on_click=move |_| navigate_month(-1)
                                >
                                    "←"
                                </Button>
                                <Button
                                    appearance=ButtonAppearance::Subtle
                                    on_click=move |_| navigate_month(1)
                                >
                                    "→"
                                </Button>
                            </div>
                            <div class="date-picker-grid">
                                {["D", "S", "T", "Q", "Q", "S", "S"]
                                    .iter()
                                    .map(|d| view! { <div class="weekday-label">{*d}</div> })
                                    .collect::<Vec<_>>()}
                                {(0..grid.first_weekday_offset)
                                    .map(|_| view! { <div class="day-cell empty"></div> }.into_any())
                                    .collect::<Vec<_>>()}
                                {(1..=grid.days_in_month)
                                    .map(|day| {
                                        let date = NaiveDate::from_ymd_opt(year, month, day);
                                        let locked = date.is_none_or(|d| {
                                            session.with_untracked(|s| !s.tracker().day_is_open(d))
                                        });
                                        view! {
                                            <button
                                                class="day-cell"
                                                disabled=locked
                                                on:click=move |_| select_day(day)
                                            >
                                                {day}
                                            </button>
                                        }
                                        .into_any()
                                    })
                                    .collect::<Vec<_>>()}
                            </div>
                        </div>
                    }
                    .into_any()
                } else {
                    view! {}.into_any()
                }
            }}

            <div class="resource-switch">
                <Button
                    appearance=Signal::derive(move || {
                        if resource.get() == ResourceType::Court {
                            ButtonAppearance::Primary
                        } else {
                            ButtonAppearance::Secondary
                        }
                    })
                    on_click=move |_| session.update(|s| s.set_resource_type(ResourceType::Court))
                >
                    "Quadra"
                </Button>
                <Button
                    appearance=Signal::derive(move || {
                        if resource.get() == ResourceType::Gourmet {
                            ButtonAppearance::Primary
                        } else {
                            ButtonAppearance::Secondary
                        }
                    })
                    on_click=move |_| session.update(|s| s.set_resource_type(ResourceType::Gourmet))
                >
                    "Gourmet"
                </Button>
            </div>

            {move || {
                conflict_notice
                    .get()
                    .map(|notice| {
                        view! {
                            <div class="conflict-notice">
                                <p>{notice}</p>
                            </div>
                        }
                    })
            }}

            <div class="week-grid">
                <div class="week-grid-header">
                    <div class="hour-label"></div>
                    {move || {
                        week_days
                            .get()
                            .iter()
                            .map(|date| {
                                let date = *date;
                                let locked = session
                                    .with_untracked(|s| !s.tracker().day_is_open(date));
                                view! {
                                    <div class=if locked { "day-header locked" } else { "day-header" }>
                                        <span class="weekday">{format::weekday_short(date)}</span>
                                        <span class="day-number">{date.day()}</span>
                                    </div>
                                }
                            })
                            .collect::<Vec<_>>()
                    }}
                </div>

                {
                    let hours = hours.clone();
                    move || {
                        let days = week_days.get();
                        hours
                            .iter()
                            .map(|hour| {
                                let hour_label = hour.clone();
                                let cells = days
                                    .iter()
                                    .map(|date| {
                                        match SlotKey::encode(*date, &hour_label) {
                                            Ok(key) => view! {
                                                <SlotCell
                                                    key
                                                    session
                                                    on_admin_edit
                                                />
                                            }
                                            .into_any(),
                                            Err(_) => view! { <div class="slot-cell empty"></div> }
                                                .into_any(),
                                        }
                                    })
                                    .collect::<Vec<_>>();
                                view! {
                                    <div class="hour-row">
                                        <div class="hour-label">{hour_label.clone()}</div>
                                        {cells}
                                    </div>
                                }
                            })
                            .collect::<Vec<_>>()
                    }
                }
            </div>

            {move || {
                if selection_count.get() > 0 && !is_admin.get() {
                    view! {
                        <div class="confirm-bar">
                            <div class="confirm-summary">
                                <p class="confirm-count">
                                    {move || {
                                        let count = selection_count.get();
                                        if count == 1 {
                                            "1 Horário".to_string()
                                        } else {
                                            format!("{} Horários", count)
                                        }
                                    }}
                                </p>
                                <p class="confirm-total">
                                    {move || format!("Total: {}", format::price(selection_subtotal.get()))}
                                </p>
                            </div>
                            <Button
                                appearance=ButtonAppearance::Primary
                                on_click=move |_| handle_confirm()
                            >
                                "RESERVAR AGORA"
                            </Button>
                        </div>
                    }
                    .into_any()
                } else {
                    view! {}.into_any()
                }
            }}

            {move || {
                if is_admin.get() {
                    view! {
                        <div class="admin-indicator">
                            "Gestão Manual Ativada"
                        </div>
                    }
                    .into_any()
                } else {
                    view! {}.into_any()
                }
            }}
        </div>
    }
}

/// One bookable cell of the week grid. Guests toggle their selection (a
/// no-op on occupied or locked cells); admins flip occupancy itself and the
/// updated snapshot is pushed straight to the backend.
#[component]
fn SlotCell(
    key: SlotKey,
    session: RwSignal<Session>,
    on_admin_edit: impl Fn(AvailabilitySnapshot) + 'static + Copy + Send + Sync,
) -> impl IntoView {
    let occupied = Memo::new(move |_| {
        session.with(|s| s.snapshot().is_occupied(&key, s.resource()))
    });
    let selected = Memo::new(move |_| session.with(|s| s.tracker().is_selected(&key)));
    let locked = Memo::new(move |_| {
        session.with(|s| !s.tracker().day_is_open(key.date()))
    });

    let handle_click = move |_| {
        let admin = session.with_untracked(|s| s.is_admin());
        if admin {
            let resource = session.with_untracked(|s| s.resource());
            let mut updated = None;
            session.update(|s| {
                if let Ok(snapshot) = s.admin_toggle(key, resource) {
                    updated = Some(snapshot);
                }
            });
            if let Some(snapshot) = updated {
                on_admin_edit(snapshot);
            }
        } else {
            session.update(|s| {
                s.toggle(key);
            });
        }
    };

    let cell_class = move || {
        if locked.get() {
            "slot-cell locked"
        } else if occupied.get() {
            "slot-cell occupied"
        } else if selected.get() {
            "slot-cell selected"
        } else {
            "slot-cell free"
        }
    };

    let cell_label = move || {
        if locked.get() {
            "—"
        } else if occupied.get() {
            "Ocupado"
        } else if selected.get() {
            "Selecionado"
        } else {
            "Livre"
        }
    };

    view! {
        <button
            class=cell_class
            disabled=move || locked.get() && !session.with_untracked(|s| s.is_admin())
            on:click=handle_click
        >
            <span class="slot-status">{cell_label}</span>
        </button>
    }
}
