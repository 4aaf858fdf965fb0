use utoipa::{
    Modify, OpenApi,
    openapi::{
        self,
        OpenApi as OpenApiSpec,
        security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
    },
};
use utoipa_scalar::{Scalar, Servable};

use crate::{
    dto::{
        auth::{
            AccessTokenResponse, AuthResponse, LoginRequest, RegisterRequest,
            ResetPasswordRequest, ResetRequest, ResetTokenResponse,
        },
        cart::{AddToCartRequest, CartList, UpdateCartRequest},
        orders::{CheckoutItem, CheckoutRequest, OrderList},
        products::{CreateProductRequest, ProductList, UpdateProductRequest},
        users::{CreateUserRequest, UpdateUserRequest, UserList},
        wishlist::{AddWishlistRequest, WishlistCheck, WishlistProducts},
    },
    models::{
        Address, CartEntry, CartLine, Order, OrderItem, OrderSummary, Product, Role, UserDocument,
        UserProfile,
    },
    response::{ApiResponse, ErrorResponse, Meta},
    routes::{admin, auth, cart, health, orders, params, products, wishlist},
};

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "bearer_auth",
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .build(),
            ),
        );
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        health::health_check,
        auth::register,
        auth::login,
        auth::refresh,
        auth::logout,
        auth::request_reset,
        auth::reset_password,
        auth::dashboard,
        products::list_products,
        products::get_product,
        cart::cart_list,
        cart::add_to_cart,
        cart::update_cart,
        cart::remove_from_cart,
        wishlist::list_wishlist,
        wishlist::add_to_wishlist,
        wishlist::remove_from_wishlist,
        wishlist::check_wishlist,
        orders::list_orders,
        orders::checkout,
        orders::get_order,
        admin::list_users,
        admin::create_user,
        admin::get_user,
        admin::update_user,
        admin::delete_user,
        admin::user_orders,
        admin::list_all_orders,
        admin::get_any_order,
        admin::list_all_products,
        admin::create_product,
        admin::update_product,
        admin::deactivate_product
    ),
    components(
        schemas(
            Role,
            Address,
            UserProfile,
            UserDocument,
            CartEntry,
            CartLine,
            Product,
            Order,
            OrderItem,
            OrderSummary,
            RegisterRequest,
            LoginRequest,
            AuthResponse,
            AccessTokenResponse,
            ResetRequest,
            ResetTokenResponse,
            ResetPasswordRequest,
            AddToCartRequest,
            UpdateCartRequest,
            CartList,
            AddWishlistRequest,
            WishlistCheck,
            WishlistProducts,
            CheckoutItem,
            CheckoutRequest,
            OrderList,
            CreateProductRequest,
            UpdateProductRequest,
            ProductList,
            CreateUserRequest,
            UpdateUserRequest,
            UserList,
            health::HealthData,
            params::Pagination,
            Meta,
            ErrorResponse,
            ApiResponse<UserProfile>,
            ApiResponse<AuthResponse>,
            ApiResponse<Product>,
            ApiResponse<ProductList>,
            ApiResponse<CartList>,
            ApiResponse<Order>,
            ApiResponse<OrderList>
        )
    ),
    security(
        ("bearer_auth" = [])
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Health", description = "Health check endpoint"),
        (name = "Auth", description = "Accounts, tokens and password reset"),
        (name = "Products", description = "Public catalog"),
        (name = "Cart", description = "Cart of the current user"),
        (name = "Wishlist", description = "Wishlist of the current user"),
        (name = "Orders", description = "Checkout and order history"),
        (name = "Admin", description = "User, order and catalog administration"),
    )
)]
pub struct ApiDoc;

pub fn scalar_docs() -> Scalar<OpenApiSpec> {
    Scalar::with_url("/docs", ApiDoc::openapi())
}
