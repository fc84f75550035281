//! Diesel schema for project board persistence.

diesel::table! {
    /// Project aggregates stored as whole documents.
    projects (id) {
        /// Project identifier.
        id -> Uuid,
        /// Owning workspace identifier, duplicated from the document for
        /// filtering.
        workspace_id -> Uuid,
        /// Optimistic concurrency revision.
        revision -> Int8,
        /// Serialized project aggregate including its board.
        document -> Jsonb,
        /// Creation timestamp.
        created_at -> Timestamptz,
        /// Last update timestamp.
        updated_at -> Timestamptz,
    }
}
