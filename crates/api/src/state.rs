use auth::AuthService;
use cart::CartService;
use payment::PaymentGateway;

/// Application state shared across all handlers
pub struct AppState {
    pub auth_service: AuthService,
    pub cart_service: CartService,
    pub payments: PaymentGateway,
}

impl AppState {
    pub fn new(auth_service: AuthService, cart_service: CartService, payments: PaymentGateway) -> Self {
        Self {
            auth_service,
            cart_service,
            payments,
        }
    }
}
