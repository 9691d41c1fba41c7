//! Diesel schema for task lifecycle persistence.

diesel::table! {
    /// Task records.
    tasks (id) {
        /// Storage-assigned task identifier.
        id -> BigInt,
        /// Owning company.
        company_id -> BigInt,
        /// Task name.
        #[max_length = 200]
        name -> Varchar,
        /// Task description.
        #[max_length = 1000]
        description -> Varchar,
        /// Deadline date.
        deadline -> Date,
        /// Payment amount.
        payment -> BigInt,
        /// Duration in weeks.
        duration -> Integer,
        /// Optional city.
        #[max_length = 50]
        city -> Nullable<Varchar>,
        /// Solo or group.
        #[max_length = 20]
        task_type -> Varchar,
        /// Lifecycle step.
        #[max_length = 20]
        task_step -> Varchar,
        /// Listing flag.
        is_active -> Bool,
        /// Completion date.
        completed_at -> Nullable<Date>,
        /// Verification date.
        verified_at -> Nullable<Date>,
        /// Creation timestamp.
        created_at -> Timestamptz,
        /// Last update timestamp.
        updated_at -> Timestamptz,
        /// Optimistic concurrency version.
        version -> BigInt,
    }
}

diesel::table! {
    /// One operation row per task.
    task_operations (id) {
        /// Storage-assigned operation identifier.
        id -> BigInt,
        /// Paired task, unique.
        task_id -> BigInt,
    }
}

diesel::table! {
    /// Access set membership.
    task_access (operation_id, user_id) {
        /// Owning operation.
        operation_id -> BigInt,
        /// Member user.
        user_id -> BigInt,
    }
}

diesel::table! {
    /// Executor set membership.
    task_executors (operation_id, user_id) {
        /// Owning operation.
        operation_id -> BigInt,
        /// Member user.
        user_id -> BigInt,
    }
}

diesel::joinable!(task_operations -> tasks (task_id));
diesel::joinable!(task_access -> task_operations (operation_id));
diesel::joinable!(task_executors -> task_operations (operation_id));

diesel::allow_tables_to_appear_in_same_query!(tasks, task_operations, task_access, task_executors);
