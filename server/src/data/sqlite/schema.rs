//! SQLite schema definitions
//!
//! Initial schema with all tables. Instants are stored as epoch milliseconds.

/// Current schema version
pub const SCHEMA_VERSION: i32 = 2;

/// Complete schema SQL (version 1)
pub const SCHEMA: &str = r#"
-- =============================================================================
-- Infrastructure: Schema version tracking
-- =============================================================================
CREATE TABLE IF NOT EXISTS schema_version (
    id INTEGER PRIMARY KEY CHECK (id = 1),
    version INTEGER NOT NULL,
    applied_at INTEGER NOT NULL,
    description TEXT
);

CREATE TABLE IF NOT EXISTS schema_migrations (
    version INTEGER PRIMARY KEY,
    name TEXT NOT NULL,
    applied_at INTEGER NOT NULL,
    checksum TEXT NOT NULL,
    execution_time_ms INTEGER,
    success INTEGER NOT NULL DEFAULT 1
);

-- =============================================================================
-- 1. Regions, countries, locations
-- =============================================================================
CREATE TABLE IF NOT EXISTS region (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    region_name TEXT
);

CREATE TABLE IF NOT EXISTS country (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    country_name TEXT,
    region_id INTEGER REFERENCES region(id)
);

CREATE INDEX IF NOT EXISTS idx_country_region ON country(region_id);

CREATE TABLE IF NOT EXISTS location (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    street_address TEXT,
    postal_code TEXT,
    city TEXT,
    state_province TEXT,
    country_id INTEGER REFERENCES country(id)
);

CREATE INDEX IF NOT EXISTS idx_location_country ON location(country_id);

-- =============================================================================
-- 2. Departments and employees
-- =============================================================================
CREATE TABLE IF NOT EXISTS department (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    department_name TEXT NOT NULL,
    location_id INTEGER REFERENCES location(id)
);

CREATE INDEX IF NOT EXISTS idx_department_location ON department(location_id);

CREATE TABLE IF NOT EXISTS employee (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    first_name TEXT,
    last_name TEXT,
    email TEXT,
    phone_number TEXT,
    hire_date INTEGER,
    salary INTEGER,
    commission_pct REAL,
    manager_id INTEGER REFERENCES employee(id),
    department_id INTEGER REFERENCES department(id)
);

CREATE INDEX IF NOT EXISTS idx_employee_manager ON employee(manager_id);
CREATE INDEX IF NOT EXISTS idx_employee_department ON employee(department_id);

-- =============================================================================
-- 3. Tasks and jobs
-- =============================================================================
CREATE TABLE IF NOT EXISTS task (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    title TEXT,
    description TEXT
);

CREATE TABLE IF NOT EXISTS job (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    job_title TEXT,
    min_salary INTEGER,
    max_salary INTEGER,
    employee_id INTEGER REFERENCES employee(id)
);

CREATE INDEX IF NOT EXISTS idx_job_employee ON job(employee_id);
"#;

/// Version 2: job/task link table
pub const MIGRATION_V2: &str = r#"
CREATE TABLE IF NOT EXISTS job_task (
    job_id INTEGER NOT NULL REFERENCES job(id) ON DELETE CASCADE,
    task_id INTEGER NOT NULL REFERENCES task(id) ON DELETE CASCADE,
    PRIMARY KEY (job_id, task_id)
);

CREATE INDEX IF NOT EXISTS idx_job_task_task ON job_task(task_id);
"#;
