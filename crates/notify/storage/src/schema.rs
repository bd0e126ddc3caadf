//! Diesel schema definitions.

diesel::table! {
    settings (id) {
        id -> Int4,
        push_enabled -> Nullable<Bool>,
        email_enabled -> Nullable<Bool>,
        whatsapp_enabled -> Nullable<Bool>,
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    admin_subscriptions (id) {
        id -> Int8,
        token -> Text,
        created_at -> Timestamptz,
    }
}

diesel::allow_tables_to_appear_in_same_query!(settings, admin_subscriptions);
