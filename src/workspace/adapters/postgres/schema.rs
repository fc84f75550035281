//! Diesel schema for workspace persistence.

diesel::table! {
    /// Workspace aggregates stored as whole documents.
    workspaces (id) {
        /// Workspace identifier.
        id -> Uuid,
        /// Unique workspace name, duplicated from the document.
        #[max_length = 255]
        name -> Varchar,
        /// Optimistic concurrency revision.
        revision -> Int8,
        /// Serialized workspace aggregate including members.
        document -> Jsonb,
        /// Creation timestamp.
        created_at -> Timestamptz,
        /// Last update timestamp.
        updated_at -> Timestamptz,
    }
}
