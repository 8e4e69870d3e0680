// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! # Booking & Catalogue Integration Tests
//!
//! ## Test Categories
//!
//! - `test_booking_*`: booking, availability, cancel ownership
//! - `test_catalogue_*`: hotel and room listing, admin catalogue edits

use std::sync::Arc;

use innkeep_tests::prelude::*;

// =============================================================================
// Booking
// =============================================================================

#[tokio::test]
async fn test_booking_create_and_read_back() {
    let app = TestApp::new();
    let (alice, token) = app.seed_with_token(&UserFixtures::alice()).await;
    let (_, room) = app.seed_hotel_with_room().await;

    let created = app
        .post(
            &format!("/api/v1/rooms/{}/book", room.id),
            Some(&token),
            StayFixtures::next_week().body(),
        )
        .await;
    created.assert_status(StatusCode::CREATED);
    assert_eq!(created.body["userId"], alice.id.to_string());
    assert_eq!(created.body["roomId"], room.id.to_string());
    assert_eq!(created.body["canceled"], false);

    let id = created.body["id"].as_str().unwrap().to_string();
    let fetched = app.get(&format!("/api/v1/bookings/{}", id), Some(&token)).await;
    fetched.assert_status(StatusCode::OK);
    assert_eq!(fetched.body["id"], id.as_str());

    let mine = app.get("/api/v1/bookings", Some(&token)).await;
    mine.assert_status(StatusCode::OK);
    assert_eq!(mine.body["meta"]["total"], 1);
}

#[tokio::test]
async fn test_booking_overlap_conflicts() {
    let app = TestApp::new();
    let (_, alice_token) = app.seed_with_token(&UserFixtures::alice()).await;
    let (_, bob_token) = app.seed_with_token(&UserFixtures::bob()).await;
    let (_, room) = app.seed_hotel_with_room().await;
    let uri = format!("/api/v1/rooms/{}/book", room.id);

    app.post(&uri, Some(&alice_token), StayFixtures::next_week().body())
        .await
        .assert_status(StatusCode::CREATED);

    let clash = app
        .post(&uri, Some(&bob_token), StayFixtures::overlapping_next_week().body())
        .await;
    clash.assert_status(StatusCode::CONFLICT);
    assert_eq!(clash.error_code(), Some("CONFLICT"));

    // Back-to-back stays share no night.
    app.post(&uri, Some(&bob_token), StayFixtures::after_next_week().body())
        .await
        .assert_status(StatusCode::CREATED);
}

#[tokio::test]
async fn test_booking_invalid_dates_rejected() {
    let app = TestApp::new();
    let (_, token) = app.seed_with_token(&UserFixtures::alice()).await;
    let (_, room) = app.seed_hotel_with_room().await;
    let uri = format!("/api/v1/rooms/{}/book", room.id);

    let reversed = app.post(&uri, Some(&token), StayFixtures::reversed().body()).await;
    reversed.assert_status(StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(reversed.error_code(), Some("VALIDATION_ERROR"));

    app.post(&uri, Some(&token), StayFixtures::in_the_past().body())
        .await
        .assert_status(StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn test_booking_unknown_room_not_found() {
    let app = TestApp::new();
    let (_, token) = app.seed_with_token(&UserFixtures::alice()).await;

    let response = app
        .post(
            &format!("/api/v1/rooms/{}/book", innkeep_core::RoomId::new()),
            Some(&token),
            StayFixtures::next_week().body(),
        )
        .await;
    response.assert_status(StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_booking_cancel_someone_elses_is_forbidden() {
    let app = TestApp::new();
    let alice = app.seed_user(&UserFixtures::alice()).await;
    let (_, bob_token) = app.seed_with_token(&UserFixtures::bob()).await;
    let (_, room) = app.seed_hotel_with_room().await;
    let booking = app.seed_booking(&alice, &room, StayFixtures::next_week()).await;

    app.put(&format!("/api/v1/bookings/{}/cancel", booking.id), Some(&bob_token), None)
        .await
        .assert_forbidden();

    let stored = app.store().bookings.find_booking(booking.id).await.unwrap();
    assert!(!stored.canceled);
}

#[tokio::test]
async fn test_booking_cancel_has_no_admin_override() {
    let app = TestApp::new();
    let alice = app.seed_user(&UserFixtures::alice()).await;
    let (_, admin_token) = app.seed_with_token(&UserFixtures::admin()).await;
    let (_, room) = app.seed_hotel_with_room().await;
    let booking = app.seed_booking(&alice, &room, StayFixtures::next_week()).await;

    app.put(&format!("/api/v1/bookings/{}/cancel", booking.id), Some(&admin_token), None)
        .await
        .assert_forbidden();
}

#[tokio::test]
async fn test_booking_cancel_own_is_idempotent() {
    let app = TestApp::new();
    let (alice, token) = app.seed_with_token(&UserFixtures::alice()).await;
    let (_, room) = app.seed_hotel_with_room().await;
    let booking = app.seed_booking(&alice, &room, StayFixtures::next_week()).await;
    let uri = format!("/api/v1/bookings/{}/cancel", booking.id);

    let first = app.put(&uri, Some(&token), None).await;
    first.assert_status(StatusCode::OK);
    assert_eq!(first.body["canceled"], true);

    let second = app.put(&uri, Some(&token), None).await;
    second.assert_status(StatusCode::OK);
    assert_eq!(second.body["canceled"], true);
}

#[tokio::test]
async fn test_booking_cancel_frees_the_room() {
    let app = TestApp::new();
    let (alice, alice_token) = app.seed_with_token(&UserFixtures::alice()).await;
    let (_, bob_token) = app.seed_with_token(&UserFixtures::bob()).await;
    let (_, room) = app.seed_hotel_with_room().await;
    let booking = app.seed_booking(&alice, &room, StayFixtures::next_week()).await;

    app.put(&format!("/api/v1/bookings/{}/cancel", booking.id), Some(&alice_token), None)
        .await
        .assert_status(StatusCode::OK);

    app.post(
        &format!("/api/v1/rooms/{}/book", room.id),
        Some(&bob_token),
        StayFixtures::overlapping_next_week().body(),
    )
    .await
    .assert_status(StatusCode::CREATED);
}

#[tokio::test]
async fn test_booking_read_guarded_with_admin_override() {
    let app = TestApp::new();
    let alice = app.seed_user(&UserFixtures::alice()).await;
    let (_, bob_token) = app.seed_with_token(&UserFixtures::bob()).await;
    let (_, admin_token) = app.seed_with_token(&UserFixtures::admin()).await;
    let (_, room) = app.seed_hotel_with_room().await;
    let booking = app.seed_booking(&alice, &room, StayFixtures::next_week()).await;
    let uri = format!("/api/v1/bookings/{}", booking.id);

    app.get(&uri, Some(&bob_token)).await.assert_forbidden();
    app.get(&uri, Some(&admin_token))
        .await
        .assert_status(StatusCode::OK);
}

#[tokio::test]
async fn test_booking_lists_are_scoped() {
    let app = TestApp::new();
    let (alice, alice_token) = app.seed_with_token(&UserFixtures::alice()).await;
    let (bob, bob_token) = app.seed_with_token(&UserFixtures::bob()).await;
    let (_, admin_token) = app.seed_with_token(&UserFixtures::admin()).await;
    let (_, room) = app.seed_hotel_with_room().await;
    app.seed_booking(&alice, &room, StayFixtures::next_week()).await;
    app.seed_booking(&bob, &room, StayFixtures::after_next_week()).await;

    let mine = app.get("/api/v1/bookings", Some(&alice_token)).await;
    assert_eq!(mine.body["meta"]["total"], 1);
    assert_eq!(mine.body["data"][0]["userId"], alice.id.to_string());

    app.get("/api/v1/admin/bookings", Some(&bob_token))
        .await
        .assert_forbidden();

    let all = app.get("/api/v1/admin/bookings", Some(&admin_token)).await;
    all.assert_status(StatusCode::OK);
    assert_eq!(all.body["meta"]["total"], 2);
}

#[tokio::test]
async fn test_booking_concurrent_overlap_single_winner() {
    let app = Arc::new(TestApp::new());
    let (_, token) = app.seed_with_token(&UserFixtures::alice()).await;
    let (_, room) = app.seed_hotel_with_room().await;
    let uri = format!("/api/v1/rooms/{}/book", room.id);
    let body = StayFixtures::next_week().body();

    let mut handles = Vec::new();
    for _ in 0..8 {
        let app = app.clone();
        let uri = uri.clone();
        let token = token.clone();
        let body = body.clone();
        handles.push(tokio::spawn(async move {
            app.post(&uri, Some(&token), body).await.status
        }));
    }

    let mut created = 0;
    let mut conflicts = 0;
    for handle in handles {
        match handle.await.unwrap() {
            StatusCode::CREATED => created += 1,
            StatusCode::CONFLICT => conflicts += 1,
            other => panic!("unexpected status {}", other),
        }
    }
    assert_eq!(created, 1);
    assert_eq!(conflicts, 7);
}

// =============================================================================
// Catalogue
// =============================================================================

#[tokio::test]
async fn test_catalogue_admin_builds_hotel_and_rooms() {
    let app = TestApp::new();
    let (_, admin_token) = app.seed_with_token(&UserFixtures::admin()).await;

    let hotel = app
        .post(
            "/api/v1/admin/hotels",
            Some(&admin_token),
            json!({ "name": "Harbour View", "location": "Porto", "rating": 5.0 }),
        )
        .await;
    hotel.assert_status(StatusCode::CREATED);
    let hotel_id = hotel.body["id"].as_str().unwrap().to_string();

    app.post(
        &format!("/api/v1/admin/hotels/{}/rooms", hotel_id),
        Some(&admin_token),
        json!({ "size": "kingsize", "seaside": true, "price": 310.0 }),
    )
    .await
    .assert_status(StatusCode::CREATED);

    let rooms = app
        .get(&format!("/api/v1/hotels/{}/rooms", hotel_id), Some(&admin_token))
        .await;
    rooms.assert_status(StatusCode::OK);
    assert_eq!(rooms.body["meta"]["total"], 1);

    let fetched = app
        .get(&format!("/api/v1/hotels/{}", hotel_id), Some(&admin_token))
        .await;
    assert_eq!(fetched.body["rooms"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_catalogue_edits_require_admin() {
    let app = TestApp::new();
    let (_, token) = app.seed_with_token(&UserFixtures::alice()).await;
    let (hotel, _) = app.seed_hotel_with_room().await;

    app.post(
        "/api/v1/admin/hotels",
        Some(&token),
        json!({ "name": "Sneaky", "location": "Nowhere", "rating": 1.0 }),
    )
    .await
    .assert_forbidden();

    app.delete(&format!("/api/v1/admin/hotels/{}", hotel.id), Some(&token))
        .await
        .assert_forbidden();
}

#[tokio::test]
async fn test_catalogue_delete_hotel_removes_rooms() {
    let app = TestApp::new();
    let (_, admin_token) = app.seed_with_token(&UserFixtures::admin()).await;
    let (hotel, room) = app.seed_hotel_with_room().await;

    let deleted = app
        .delete(&format!("/api/v1/admin/hotels/{}", hotel.id), Some(&admin_token))
        .await;
    deleted.assert_status(StatusCode::OK);
    assert_eq!(deleted.body["deleted"], hotel.id.to_string());

    app.get(&format!("/api/v1/hotels/{}", hotel.id), Some(&admin_token))
        .await
        .assert_status(StatusCode::NOT_FOUND);
    assert!(app.store().rooms.find_room(room.id).await.is_err());
}

#[tokio::test]
async fn test_catalogue_filters() {
    let app = TestApp::new();
    let (_, token) = app.seed_with_token(&UserFixtures::alice()).await;
    let (_, seaside_room) = app.seed_hotel_with_room().await;
    let city = app
        .store()
        .hotels
        .insert_hotel(CatalogueFixtures::city_inn().into_hotel())
        .await
        .unwrap();
    app.store()
        .rooms
        .insert_room(CatalogueFixtures::small_inland().into_room(city.id))
        .await
        .unwrap();

    let rated = app.get("/api/v1/hotels?rating=3", Some(&token)).await;
    rated.assert_status(StatusCode::OK);
    assert_eq!(rated.body["meta"]["total"], 1);
    assert_eq!(rated.body["data"][0]["name"], "City Inn");

    let seaside = app.get("/api/v1/rooms?seaside=true", Some(&token)).await;
    assert_eq!(seaside.body["meta"]["total"], 1);
    assert_eq!(seaside.body["data"][0]["id"], seaside_room.id.to_string());

    let small = app.get("/api/v1/rooms?size=small", Some(&token)).await;
    assert_eq!(small.body["meta"]["total"], 1);

    app.get("/api/v1/rooms?size=penthouse", Some(&token))
        .await
        .assert_status(StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn test_catalogue_pagination_bounds() {
    let app = TestApp::new();
    let (_, token) = app.seed_with_token(&UserFixtures::alice()).await;

    app.get("/api/v1/hotels?page=0", Some(&token))
        .await
        .assert_status(StatusCode::UNPROCESSABLE_ENTITY);
    app.get("/api/v1/hotels?perPage=500", Some(&token))
        .await
        .assert_status(StatusCode::UNPROCESSABLE_ENTITY);
    app.get("/api/v1/hotels?page=abc", Some(&token))
        .await
        .assert_status(StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_catalogue_unknown_hotel_rooms_not_found() {
    let app = TestApp::new();
    let (_, token) = app.seed_with_token(&UserFixtures::alice()).await;

    app.get(
        &format!("/api/v1/hotels/{}/rooms", innkeep_core::HotelId::new()),
        Some(&token),
    )
    .await
    .assert_status(StatusCode::NOT_FOUND);
}
