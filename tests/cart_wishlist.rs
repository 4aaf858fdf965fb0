mod common;

use storefront_api::{
    dto::{
        cart::{AddToCartRequest, UpdateCartRequest},
        products::UpdateProductRequest,
        wishlist::AddWishlistRequest,
    },
    error::AppError,
    middleware::auth::AuthUser,
    services::{admin_service, cart_service, product_service, wishlist_service},
};
use uuid::Uuid;

fn add(product_id: Uuid, quantity: i32) -> AddToCartRequest {
    AddToCartRequest {
        product_id,
        quantity,
    }
}

async fn quantities(state: &storefront_api::state::AppState, user: &AuthUser) -> anyhow::Result<Vec<(Uuid, i32)>> {
    let cart = cart_service::list_cart(state, user).await?.data.expect("cart");
    Ok(cart
        .items
        .into_iter()
        .map(|line| (line.product.id, line.quantity))
        .collect())
}

#[tokio::test]
async fn adding_twice_accumulates_quantity() -> anyhow::Result<()> {
    let state = common::setup_state().await?;
    let user = common::shopper(&state, "hal").await?;
    let mug = common::create_product(&state, "Mug", 1200).await?;

    cart_service::add_to_cart(&state, &user, add(mug.id, 2)).await?;
    let cart = cart_service::add_to_cart(&state, &user, add(mug.id, 3))
        .await?
        .data
        .expect("cart");

    assert_eq!(cart.items.len(), 1);
    assert_eq!(cart.items[0].quantity, 5);
    assert_eq!(cart.items[0].product.title, "Mug");
    Ok(())
}

#[tokio::test]
async fn add_rejects_bad_quantity_and_unknown_products() -> anyhow::Result<()> {
    let state = common::setup_state().await?;
    let user = common::shopper(&state, "ida").await?;
    let mug = common::create_product(&state, "Mug", 1200).await?;

    assert!(matches!(
        cart_service::add_to_cart(&state, &user, add(mug.id, 0)).await,
        Err(AppError::Validation(_))
    ));
    assert!(matches!(
        cart_service::add_to_cart(&state, &user, add(Uuid::new_v4(), 1)).await,
        Err(AppError::NotFound("Product"))
    ));
    assert!(quantities(&state, &user).await?.is_empty());
    Ok(())
}

#[tokio::test]
async fn line_quantity_is_capped() -> anyhow::Result<()> {
    let state = common::setup_state().await?;
    let user = common::shopper(&state, "max").await?;
    let mug = common::create_product(&state, "Mug", 1200).await?;

    assert!(matches!(
        cart_service::add_to_cart(&state, &user, add(mug.id, i32::MAX)).await,
        Err(AppError::Validation(_))
    ));
    assert!(quantities(&state, &user).await?.is_empty());

    cart_service::add_to_cart(&state, &user, add(mug.id, cart_service::MAX_CART_QUANTITY)).await?;
    assert!(matches!(
        cart_service::add_to_cart(&state, &user, add(mug.id, 1)).await,
        Err(AppError::Validation(_))
    ));
    let growth = UpdateCartRequest {
        product_id: mug.id,
        quantity: i32::MAX,
    };
    assert!(matches!(
        cart_service::update_cart(&state, &user, growth).await,
        Err(AppError::Validation(_))
    ));
    assert_eq!(
        quantities(&state, &user).await?,
        vec![(mug.id, cart_service::MAX_CART_QUANTITY)]
    );
    Ok(())
}

#[tokio::test]
async fn remove_is_idempotent() -> anyhow::Result<()> {
    let state = common::setup_state().await?;
    let user = common::shopper(&state, "jo").await?;
    let mug = common::create_product(&state, "Mug", 1200).await?;
    let tee = common::create_product(&state, "Tee", 2000).await?;

    cart_service::add_to_cart(&state, &user, add(mug.id, 1)).await?;
    cart_service::add_to_cart(&state, &user, add(tee.id, 1)).await?;

    cart_service::remove_from_cart(&state, &user, mug.id).await?;
    assert_eq!(quantities(&state, &user).await?, vec![(tee.id, 1)]);

    cart_service::remove_from_cart(&state, &user, mug.id).await?;
    assert_eq!(quantities(&state, &user).await?, vec![(tee.id, 1)]);
    Ok(())
}

#[tokio::test]
async fn signed_updates_adjust_and_remove_entries() -> anyhow::Result<()> {
    let state = common::setup_state().await?;
    let user = common::shopper(&state, "kit").await?;
    let mug = common::create_product(&state, "Mug", 1200).await?;

    cart_service::add_to_cart(&state, &user, add(mug.id, 4)).await?;

    let update = |quantity| UpdateCartRequest {
        product_id: mug.id,
        quantity,
    };

    cart_service::update_cart(&state, &user, update(-1)).await?;
    assert_eq!(quantities(&state, &user).await?, vec![(mug.id, 3)]);

    cart_service::update_cart(&state, &user, update(0)).await?;
    assert_eq!(quantities(&state, &user).await?, vec![(mug.id, 3)]);

    cart_service::update_cart(&state, &user, update(2)).await?;
    assert_eq!(quantities(&state, &user).await?, vec![(mug.id, 5)]);

    cart_service::update_cart(&state, &user, update(-10)).await?;
    assert!(quantities(&state, &user).await?.is_empty());

    // shrinking an absent entry changes nothing
    cart_service::update_cart(&state, &user, update(-1)).await?;
    assert!(quantities(&state, &user).await?.is_empty());

    cart_service::update_cart(&state, &user, update(2)).await?;
    assert_eq!(quantities(&state, &user).await?, vec![(mug.id, 2)]);
    Ok(())
}

#[tokio::test]
async fn inactive_products_drop_out_of_reads() -> anyhow::Result<()> {
    let state = common::setup_state().await?;
    let admin = common::admin(&state).await?;
    let user = common::shopper(&state, "lu").await?;
    let mug = common::create_product(&state, "Mug", 1200).await?;
    let tee = common::create_product(&state, "Tee", 2000).await?;

    cart_service::add_to_cart(&state, &user, add(mug.id, 1)).await?;
    cart_service::add_to_cart(&state, &user, add(tee.id, 1)).await?;
    wishlist_service::add_to_wishlist(&state, &user, AddWishlistRequest { product_id: mug.id }).await?;

    product_service::deactivate_product(&state, &admin, mug.id).await?;

    assert_eq!(quantities(&state, &user).await?, vec![(tee.id, 1)]);
    let wishlist = wishlist_service::list_wishlist(&state, &user)
        .await?
        .data
        .expect("wishlist");
    assert!(wishlist.items.is_empty());

    assert!(matches!(
        cart_service::add_to_cart(&state, &user, add(mug.id, 1)).await,
        Err(AppError::NotFound("Product"))
    ));

    product_service::update_product(
        &state,
        &admin,
        mug.id,
        UpdateProductRequest {
            is_active: Some(true),
            ..Default::default()
        },
    )
    .await?;
    assert_eq!(quantities(&state, &user).await?.len(), 2);
    Ok(())
}

#[tokio::test]
async fn wishlist_has_set_semantics() -> anyhow::Result<()> {
    let state = common::setup_state().await?;
    let user = common::shopper(&state, "mo").await?;
    let mug = common::create_product(&state, "Mug", 1200).await?;

    let request = || AddWishlistRequest { product_id: mug.id };
    wishlist_service::add_to_wishlist(&state, &user, request()).await?;
    wishlist_service::add_to_wishlist(&state, &user, request()).await?;

    let wishlist = wishlist_service::list_wishlist(&state, &user)
        .await?
        .data
        .expect("wishlist");
    assert_eq!(wishlist.items.len(), 1);
    assert_eq!(wishlist.items[0].id, mug.id);

    let check = wishlist_service::check_wishlist(&state, &user, mug.id)
        .await?
        .data
        .expect("check");
    assert!(check.is_in_wishlist);

    wishlist_service::remove_from_wishlist(&state, &user, mug.id).await?;
    wishlist_service::remove_from_wishlist(&state, &user, mug.id).await?;

    let check = wishlist_service::check_wishlist(&state, &user, mug.id)
        .await?
        .data
        .expect("check");
    assert!(!check.is_in_wishlist);
    Ok(())
}

#[tokio::test]
async fn wishlist_rejects_unknown_products() -> anyhow::Result<()> {
    let state = common::setup_state().await?;
    let user = common::shopper(&state, "ned").await?;

    let err = wishlist_service::add_to_wishlist(
        &state,
        &user,
        AddWishlistRequest {
            product_id: Uuid::new_v4(),
        },
    )
    .await
    .unwrap_err();
    assert!(matches!(err, AppError::NotFound("Product")));
    Ok(())
}

#[tokio::test]
async fn deleted_user_cannot_touch_cart_or_wishlist() -> anyhow::Result<()> {
    let state = common::setup_state().await?;
    let admin = common::admin(&state).await?;
    let user = common::shopper(&state, "ola").await?;
    let mug = common::create_product(&state, "Mug", 1200).await?;

    cart_service::add_to_cart(&state, &user, add(mug.id, 1)).await?;
    admin_service::delete_user(&state, &admin, user.user_id).await?;

    assert!(matches!(
        cart_service::list_cart(&state, &user).await,
        Err(AppError::NotFound("User"))
    ));
    assert!(matches!(
        cart_service::add_to_cart(&state, &user, add(mug.id, 1)).await,
        Err(AppError::NotFound("User"))
    ));
    assert!(matches!(
        wishlist_service::check_wishlist(&state, &user, mug.id).await,
        Err(AppError::NotFound("User"))
    ));
    Ok(())
}
