//! Diesel table definitions for the PostgreSQL schema.
//!
//! These definitions must match the database migrations exactly; Diesel uses
//! them for compile-time query validation and type-safe SQL generation.
//! Status and role columns store the snake_case string forms of the domain
//! enums.

diesel::table! {
    /// Application user profiles. Accounts are deactivated, never deleted.
    user_profiles (id) {
        id -> Uuid,
        email -> Varchar,
        full_name -> Varchar,
        role -> Varchar,
        phone -> Nullable<Varchar>,
        is_active -> Bool,
        company_id -> Nullable<Uuid>,
        created_at -> Timestamptz,
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    /// Contracting companies.
    companies (id) {
        id -> Uuid,
        name -> Varchar,
        code -> Nullable<Varchar>,
        project -> Nullable<Varchar>,
        gate -> Nullable<Varchar>,
        is_active -> Bool,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// Equipment type catalogue.
    equipment_types (id) {
        id -> Uuid,
        name -> Varchar,
        category -> Varchar,
        classification -> Nullable<Varchar>,
        is_active -> Bool,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// Vehicles and heavy equipment registered at the gates.
    ///
    /// `blacklisted` is an override flag read together with `status`; the
    /// pair is always written together by the status transition path.
    vehicle_equipment (id) {
        id -> Uuid,
        plate_number -> Varchar,
        driver_name -> Nullable<Varchar>,
        national_id -> Nullable<Varchar>,
        company_id -> Nullable<Uuid>,
        equipment_type_id -> Nullable<Uuid>,
        year_of_manufacture -> Nullable<Int4>,
        project -> Nullable<Varchar>,
        gate -> Nullable<Varchar>,
        status -> Varchar,
        next_inspection_date -> Nullable<Date>,
        blacklisted -> Bool,
        created_by -> Nullable<Uuid>,
        created_at -> Timestamptz,
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    /// Inspections. `verified_at` is written at most once, guarded by a
    /// conditional update on it still being null.
    inspections (id) {
        id -> Uuid,
        vehicle_equipment_id -> Uuid,
        inspection_type -> Varchar,
        assignment_id -> Nullable<Uuid>,
        assigned_inspector_id -> Nullable<Uuid>,
        assigned_by -> Nullable<Uuid>,
        scheduled_date -> Timestamptz,
        started_at -> Nullable<Timestamptz>,
        completed_at -> Nullable<Timestamptz>,
        result -> Varchar,
        failure_reason -> Nullable<Text>,
        notes -> Nullable<Text>,
        verified_by -> Nullable<Uuid>,
        verified_at -> Nullable<Timestamptz>,
        status -> Varchar,
        created_at -> Timestamptz,
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    /// Checklist lines captured with a submission. Append-only.
    inspection_checklist_items (id) {
        id -> Uuid,
        inspection_id -> Uuid,
        item_name -> Varchar,
        item_description -> Nullable<Text>,
        passed -> Nullable<Bool>,
        notes -> Nullable<Text>,
        checked_at -> Nullable<Timestamptz>,
    }
}

diesel::table! {
    /// Company inspection bookings.
    assignments (id) {
        id -> Uuid,
        company_id -> Uuid,
        inspector_id -> Nullable<Uuid>,
        scheduled_date -> Timestamptz,
        status -> Varchar,
        notes -> Nullable<Text>,
        created_at -> Timestamptz,
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    /// Administrator-maintained canonical failure reasons. Names are unique.
    failure_reasons (id) {
        id -> Uuid,
        name -> Varchar,
        is_active -> Bool,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// Append-only audit trail. Rows are never updated or deleted; change
    /// values are stored raw and redacted at render time.
    audit_logs (id) {
        id -> Int8,
        user_id -> Nullable<Uuid>,
        user_email -> Nullable<Varchar>,
        user_role -> Nullable<Varchar>,
        action -> Varchar,
        table_name -> Nullable<Varchar>,
        record_id -> Nullable<Varchar>,
        old_values -> Nullable<Jsonb>,
        new_values -> Nullable<Jsonb>,
        ip_address -> Nullable<Varchar>,
        created_at -> Timestamptz,
    }
}

diesel::allow_tables_to_appear_in_same_query!(
    user_profiles,
    companies,
    equipment_types,
    vehicle_equipment,
    inspections,
    inspection_checklist_items,
    assignments,
    failure_reasons,
    audit_logs,
);
