//! Diesel schema for tracker persistence.

diesel::table! {
    /// Project records.
    projects (id) {
        /// Project identifier.
        id -> Uuid,
        /// Identity that owns the project.
        owner_identity -> Text,
        /// Project title.
        #[max_length = 255]
        title -> Varchar,
        /// Free-form description.
        description -> Text,
        /// Optional cover image URL.
        image_url -> Nullable<Text>,
        /// Creation timestamp.
        created_at -> Timestamptz,
        /// Last update timestamp.
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    /// Sprint records, cascaded from their project.
    sprints (id) {
        /// Sprint identifier.
        id -> Uuid,
        /// Parent project identifier.
        project_id -> Uuid,
        /// Identity that owns the sprint.
        owner_identity -> Text,
        /// Sprint title.
        #[max_length = 255]
        title -> Varchar,
        /// First day of the sprint.
        start_date -> Date,
        /// Last day of the sprint.
        end_date -> Date,
        /// Goals written at planning time.
        starting_thoughts -> Text,
        /// Retrospective notes.
        ending_thoughts -> Nullable<Text>,
        /// Planning status.
        #[max_length = 50]
        status -> Varchar,
        /// Creation timestamp.
        created_at -> Timestamptz,
        /// Last update timestamp.
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    /// Task records, cascaded from their sprint.
    tasks (id) {
        /// Task identifier.
        id -> Uuid,
        /// Parent sprint identifier.
        sprint_id -> Uuid,
        /// Identity that owns the task.
        owner_identity -> Text,
        /// Task title.
        #[max_length = 255]
        title -> Varchar,
        /// Optional description.
        description -> Nullable<Text>,
        /// Board status.
        #[max_length = 50]
        status -> Varchar,
        /// First entry into the in-progress column.
        started_at -> Nullable<Timestamptz>,
        /// First entry into the done column.
        finished_at -> Nullable<Timestamptz>,
        /// Creation timestamp.
        created_at -> Timestamptz,
        /// Last update timestamp.
        updated_at -> Timestamptz,
    }
}

diesel::joinable!(sprints -> projects (project_id));
diesel::joinable!(tasks -> sprints (sprint_id));

diesel::allow_tables_to_appear_in_same_query!(projects, sprints, tasks);
