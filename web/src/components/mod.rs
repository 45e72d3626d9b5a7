pub mod booking_modal;
pub mod checkout_modal;

// Re-export commonly used types
pub use booking_modal::BookingModal;
pub use checkout_modal::CheckoutModal;
