//! Provider directory operations.

use rusqlite::{params, params_from_iter, Connection};

use super::lookup::insert_problem_mapping;
use super::{Database, DbResult};
use crate::models::{
    Doctor, DirectorySnapshot, Hospital, Location, LocationFilter, ProviderRow,
    ResolvedSpecialtySet,
};

/// Row counts per directory table.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DirectoryCounts {
    pub locations: usize,
    pub hospitals: usize,
    pub doctors: usize,
    pub problem_mappings: usize,
}

impl Database {
    /// Insert a location.
    pub fn insert_location(&self, location: &Location) -> DbResult<()> {
        insert_location(&self.conn, location)
    }

    /// Insert a hospital.
    pub fn insert_hospital(&self, hospital: &Hospital) -> DbResult<()> {
        insert_hospital(&self.conn, hospital)
    }

    /// Insert a doctor.
    pub fn insert_doctor(&self, doctor: &Doctor) -> DbResult<()> {
        insert_doctor(&self.conn, doctor)
    }

    /// Replace every directory table with the snapshot, atomically.
    pub fn replace_directory(&mut self, snapshot: &DirectorySnapshot) -> DbResult<DirectoryCounts> {
        let tx = self.transaction()?;

        tx.execute_batch(
            r#"
            DELETE FROM doctors;
            DELETE FROM hospitals;
            DELETE FROM locations;
            DELETE FROM problem_specialty_map;
            "#,
        )?;

        for location in &snapshot.locations {
            insert_location(&tx, location)?;
        }
        for hospital in &snapshot.hospitals {
            insert_hospital(&tx, hospital)?;
        }
        for doctor in &snapshot.doctors {
            insert_doctor(&tx, doctor)?;
        }
        for mapping in &snapshot.problem_map {
            insert_problem_mapping(&tx, mapping)?;
        }

        let counts = count_tables(&tx)?;
        tx.commit()?;
        Ok(counts)
    }

    /// Row counts per directory table.
    pub fn directory_counts(&self) -> DbResult<DirectoryCounts> {
        count_tables(&self.conn)
    }

    /// Doctors whose specialty is in `specialties`, joined to hospital and location.
    ///
    /// Rows come back in doctor insertion order. Doctors without a hospital,
    /// and hospitals without a location, never match. Filter predicates are
    /// compared case-insensitively.
    pub fn find_providers(
        &self,
        specialties: &ResolvedSpecialtySet,
        filter: Option<&LocationFilter>,
    ) -> DbResult<Vec<ProviderRow>> {
        let mut values: Vec<String> = specialties.iter().map(str::to_lowercase).collect();
        let placeholders = (1..=values.len())
            .map(|i| format!("?{}", i))
            .collect::<Vec<_>>()
            .join(", ");

        let mut sql = format!(
            r#"
            SELECT d.name, d.specialty, d.qualification,
                   h.name, h.type, h.address,
                   l.city, l.district, l.country
            FROM doctors d
            JOIN hospitals h ON d.hospital_id = h.id
            JOIN locations l ON h.location_id = l.id
            WHERE fold_case(d.specialty) IN ({})
            "#,
            placeholders
        );

        if let Some(filter) = filter {
            // Column names come from a fixed list, only values are bound.
            for (column, value) in filter.predicates() {
                values.push(value.to_lowercase());
                sql.push_str(&format!(" AND fold_case(l.{}) = ?{}", column, values.len()));
            }
        }
        sql.push_str(" ORDER BY d.id");

        let mut stmt = self.conn.prepare(&sql)?;
        let rows = stmt.query_map(params_from_iter(values.iter()), |row| {
            Ok(ProviderRow {
                doctor_name: row.get(0)?,
                specialty: row.get(1)?,
                qualification: row.get(2)?,
                hospital_name: row.get(3)?,
                hospital_type: row.get(4)?,
                hospital_address: row.get(5)?,
                city: row.get(6)?,
                district: row.get(7)?,
                country: row.get(8)?,
            })
        })?;

        let mut providers = Vec::new();
        for row in rows {
            providers.push(row?);
        }
        Ok(providers)
    }
}

fn insert_location(conn: &Connection, location: &Location) -> DbResult<()> {
    conn.execute(
        "INSERT INTO locations (id, city, district, country) VALUES (?1, ?2, ?3, ?4)",
        params![location.id, location.city, location.district, location.country],
    )?;
    Ok(())
}

fn insert_hospital(conn: &Connection, hospital: &Hospital) -> DbResult<()> {
    conn.execute(
        "INSERT INTO hospitals (id, name, type, address, location_id) VALUES (?1, ?2, ?3, ?4, ?5)",
        params![
            hospital.id,
            hospital.name,
            hospital.hospital_type,
            hospital.address,
            hospital.location_id,
        ],
    )?;
    Ok(())
}

fn insert_doctor(conn: &Connection, doctor: &Doctor) -> DbResult<()> {
    conn.execute(
        r#"
        INSERT INTO doctors (id, name, specialty, qualification, nmc_number, hospital_id)
        VALUES (?1, ?2, ?3, ?4, ?5, ?6)
        "#,
        params![
            doctor.id,
            doctor.name,
            doctor.specialty,
            doctor.qualification,
            doctor.nmc_number,
            doctor.hospital_id,
        ],
    )?;
    Ok(())
}

fn count_tables(conn: &Connection) -> DbResult<DirectoryCounts> {
    let count = |table: &str| -> DbResult<usize> {
        let n: i64 = conn.query_row(&format!("SELECT COUNT(*) FROM {}", table), [], |row| {
            row.get(0)
        })?;
        Ok(n as usize)
    };

    Ok(DirectoryCounts {
        locations: count("locations")?,
        hospitals: count("hospitals")?,
        doctors: count("doctors")?,
        problem_mappings: count("problem_specialty_map")?,
    })
}
