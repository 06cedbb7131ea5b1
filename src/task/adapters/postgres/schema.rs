//! Diesel schema for task board persistence.

diesel::table! {
    /// Users mirrored from the authentication collaborator.
    users (id) {
        /// User identifier.
        id -> Uuid,
        /// Display name.
        #[max_length = 255]
        name -> Varchar,
        /// Role name.
        #[max_length = 20]
        role -> Varchar,
    }
}

diesel::table! {
    /// Boards owned by owner-role users.
    boards (id) {
        /// Board identifier.
        id -> Uuid,
        /// Owning user.
        owner_id -> Uuid,
        /// Board title.
        #[max_length = 255]
        title -> Varchar,
        /// Optional description.
        description -> Nullable<Text>,
        /// Creation timestamp.
        created_at -> Timestamptz,
        /// Last update timestamp.
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    /// Tasks with their workflow status and optimistic version.
    tasks (id) {
        /// Task identifier.
        id -> Uuid,
        /// Owning board.
        board_id -> Uuid,
        /// Task title.
        #[max_length = 255]
        title -> Varchar,
        /// Task description.
        description -> Text,
        /// Workflow status.
        #[max_length = 20]
        status -> Varchar,
        /// Assigned user, if any.
        assignee_id -> Nullable<Uuid>,
        /// Optional due date.
        due_date -> Nullable<Date>,
        /// Optimistic concurrency version.
        version -> Int8,
        /// Creation timestamp.
        created_at -> Timestamptz,
        /// Last update timestamp.
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    /// Labels attached to tasks.
    task_labels (id) {
        /// Label identifier.
        id -> Uuid,
        /// Labelled task.
        task_id -> Uuid,
        /// Label title.
        #[max_length = 255]
        title -> Varchar,
        /// Creation timestamp.
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// Append-only status history.
    status_changes (id) {
        /// Record identifier.
        id -> Uuid,
        /// Insertion sequence used to break timestamp ties.
        position -> Int8,
        /// Task whose status changed.
        task_id -> Uuid,
        /// Board the task belonged to.
        board_id -> Uuid,
        /// Acting user's name.
        #[max_length = 255]
        actor_name -> Varchar,
        /// Status before the change.
        #[max_length = 20]
        from_status -> Varchar,
        /// Status after the change.
        #[max_length = 20]
        to_status -> Varchar,
        /// Stored change description.
        detail -> Text,
        /// Time the change was recorded.
        created_at -> Timestamptz,
    }
}

diesel::joinable!(tasks -> boards (board_id));
diesel::joinable!(task_labels -> tasks (task_id));
diesel::joinable!(status_changes -> boards (board_id));

diesel::allow_tables_to_appear_in_same_query!(users, boards, tasks, task_labels, status_changes);
