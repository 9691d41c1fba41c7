//! Diesel schema for the externally managed user and company tables.

diesel::table! {
    /// User records maintained by the user CRUD service.
    users (id) {
        /// User identifier.
        id -> BigInt,
        /// Role in canonical string form.
        #[max_length = 50]
        role -> Varchar,
        /// Employing company.
        company_id -> BigInt,
    }
}

diesel::table! {
    /// Company records maintained by the company CRUD service.
    companies (id) {
        /// Company identifier.
        id -> BigInt,
    }
}
