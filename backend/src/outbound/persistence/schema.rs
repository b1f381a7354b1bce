//! Diesel table definitions.
//!
//! Must match `backend/migrations`; regenerate with `diesel print-schema`
//! after changing a migration.

diesel::table! {
    users (id) {
        id -> Uuid,
        email -> Varchar,
        display_name -> Varchar,
        role -> Varchar,
        password_hash -> Varchar,
        phone -> Nullable<Varchar>,
        image_url -> Nullable<Text>,
        created_at -> Timestamptz,
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    provider_profiles (user_id) {
        user_id -> Uuid,
        bio -> Text,
        instagram_url -> Nullable<Text>,
        tiktok_url -> Nullable<Text>,
        facebook_url -> Nullable<Text>,
        website_url -> Nullable<Text>,
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    services (id) {
        id -> Uuid,
        barber_id -> Uuid,
        name -> Varchar,
        description -> Nullable<Varchar>,
        price_cents -> Int8,
        duration_minutes -> Int4,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    availability_windows (barber_id, day_of_week, start_minute) {
        barber_id -> Uuid,
        day_of_week -> Int2,
        start_minute -> Int4,
        end_minute -> Int4,
    }
}

diesel::table! {
    social_clicks (id) {
        id -> Uuid,
        barber_id -> Uuid,
        platform -> Varchar,
        clicked_at -> Timestamptz,
    }
}

diesel::table! {
    appointments (id) {
        id -> Uuid,
        client_id -> Uuid,
        barber_id -> Uuid,
        service_id -> Uuid,
        starts_at -> Timestamptz,
        ends_at -> Timestamptz,
        status -> Varchar,
        notes -> Nullable<Varchar>,
        created_at -> Timestamptz,
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    promotions (id) {
        id -> Uuid,
        barber_id -> Nullable<Uuid>,
        title -> Varchar,
        description -> Nullable<Text>,
        discount_percent -> Int2,
        starts_at -> Timestamptz,
        ends_at -> Timestamptz,
        active -> Bool,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    posts (id) {
        id -> Uuid,
        author_id -> Uuid,
        content -> Varchar,
        image_url -> Nullable<Text>,
        like_count -> Int4,
        comment_count -> Int4,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    post_likes (post_id, user_id) {
        post_id -> Uuid,
        user_id -> Uuid,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    comments (id) {
        id -> Uuid,
        post_id -> Uuid,
        author_id -> Uuid,
        content -> Varchar,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    messages (id) {
        id -> Uuid,
        sender_id -> Uuid,
        recipient_id -> Uuid,
        body -> Varchar,
        read_at -> Nullable<Timestamptz>,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    invoices (id) {
        id -> Uuid,
        appointment_id -> Nullable<Uuid>,
        client_id -> Uuid,
        barber_id -> Uuid,
        status -> Varchar,
        line_items -> Jsonb,
        subtotal_cents -> Int8,
        discount_cents -> Int8,
        total_cents -> Int8,
        issued_at -> Timestamptz,
        paid_at -> Nullable<Timestamptz>,
    }
}

diesel::table! {
    reviews (id) {
        id -> Uuid,
        appointment_id -> Uuid,
        barber_id -> Uuid,
        client_id -> Uuid,
        rating -> Int2,
        comment -> Nullable<Varchar>,
        response -> Nullable<Varchar>,
        responded_at -> Nullable<Timestamptz>,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    push_subscriptions (id) {
        id -> Uuid,
        user_id -> Uuid,
        endpoint -> Text,
        p256dh -> Text,
        auth -> Text,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    gallery_images (id) {
        id -> Uuid,
        barber_id -> Uuid,
        storage_key -> Text,
        url -> Text,
        caption -> Nullable<Varchar>,
        created_at -> Timestamptz,
    }
}

diesel::joinable!(provider_profiles -> users (user_id));
diesel::joinable!(services -> users (barber_id));
diesel::joinable!(appointments -> services (service_id));
diesel::joinable!(posts -> users (author_id));
diesel::joinable!(comments -> posts (post_id));
diesel::joinable!(comments -> users (author_id));
diesel::joinable!(post_likes -> posts (post_id));
diesel::joinable!(reviews -> users (client_id));

diesel::allow_tables_to_appear_in_same_query!(
    users,
    provider_profiles,
    services,
    availability_windows,
    social_clicks,
    appointments,
    promotions,
    posts,
    post_likes,
    comments,
    messages,
    invoices,
    reviews,
    push_subscriptions,
    gallery_images,
);
