//! Demo data for first-run databases.
//!
//! # Invariants
//! - Each table is seeded only when empty, so re-running is a no-op.
//! - Seeding of one table runs in a single transaction.

use super::DbResult;
use log::info;
use rusqlite::{params, Connection};

const DEMO_USERS: &[(&str, &str, &str)] = &[
    ("u1", "Ana Silva", "ana.silva@example.com"),
    ("u2", "Beatriz Cardoso", "beatriz.cardoso@example.com"),
    ("u3", "Carla Oliveira", "carla.oliveira@example.com"),
    ("u4", "David Costa", "david.costa@example.com"),
    ("u5", "Eva Martins", "eva.martins@example.com"),
    ("u6", "Filipe Rodrigues", "filipe.rodrigues@example.com"),
    ("u7", "Gabriela Ferreira", "gabriela.ferreira@example.com"),
    ("u8", "Hugo Alves", "hugo.alves@example.com"),
    ("u9", "Inês Pereira", "ines.pereira@example.com"),
    ("u10", "João Lima", "joao.lima@example.com"),
];

struct DemoWorkshop {
    id: &'static str,
    title: &'static str,
    description: &'static str,
    date_time: &'static str,
    capacity: u32,
}

const DEMO_WORKSHOPS: &[DemoWorkshop] = &[
    DemoWorkshop {
        id: "1",
        title: "Introdução ao React Native",
        description: "Aprenda os fundamentos do desenvolvimento mobile com React Native e Expo.",
        date_time: "2025-12-15T14:00:00",
        capacity: 30,
    },
    DemoWorkshop {
        id: "2",
        title: "Node.js Avançado",
        description: "Técnicas avançadas de desenvolvimento backend com Node.js.",
        date_time: "2025-12-18T10:00:00",
        capacity: 20,
    },
    DemoWorkshop {
        id: "3",
        title: "Design de UI/UX para Mobile",
        description: "Princípios de design para aplicações mobile.",
        date_time: "2025-12-20T16:00:00",
        capacity: 25,
    },
    DemoWorkshop {
        id: "4",
        title: "TypeScript na Prática",
        description: "Domine TypeScript e melhore a qualidade do seu código.",
        date_time: "2025-12-22T14:00:00",
        capacity: 35,
    },
    DemoWorkshop {
        id: "5",
        title: "Introdução ao NextJS",
        description: "Domine NextJS e melhore a qualidade do seu código.",
        date_time: "2025-12-22T14:00:00",
        capacity: 2,
    },
    DemoWorkshop {
        id: "6",
        title: "Introdução ao Vue.js (Passado)",
        description: "Workshop introdutório sobre o framework Vue.js.",
        date_time: "2023-01-15T10:00:00",
        capacity: 20,
    },
    DemoWorkshop {
        id: "7",
        title: "CSS Grid & Flexbox (Passado)",
        description: "Domine layouts modernos com CSS.",
        date_time: "2023-02-20T14:00:00",
        capacity: 25,
    },
];

const DEMO_ORGANIZER: (&str, &str) = ("org1", "Organizador");

/// (id, workshop, name, email, registered_at epoch ms)
const DEMO_REGISTRATIONS: &[(&str, &str, &str, &str, i64)] = &[
    ("r1", "1", "Pedro Costa", "pedro@example.com", 1_764_583_200_000),
    ("r2", "1", "Ana Rodrigues", "ana@example.com", 1_764_588_600_000),
];

/// Seed counts reported back to the caller.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SeedReport {
    pub users: usize,
    pub workshops: usize,
    pub registrations: usize,
}

/// Inserts demo users, workshops and registrations into empty tables.
pub fn seed_demo_data(conn: &mut Connection) -> DbResult<SeedReport> {
    let mut report = SeedReport::default();

    if table_is_empty(conn, "users")? {
        let tx = conn.transaction()?;
        for (id, name, email) in DEMO_USERS {
            tx.execute(
                "INSERT INTO users (id, name, email) VALUES (?1, ?2, ?3);",
                params![id, name, email],
            )?;
        }
        tx.commit()?;
        report.users = DEMO_USERS.len();
    }

    if table_is_empty(conn, "workshops")? {
        let tx = conn.transaction()?;
        for workshop in DEMO_WORKSHOPS {
            tx.execute(
                "INSERT INTO workshops (
                    id, title, description, date_time, capacity, organizer_id, organizer_name
                ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7);",
                params![
                    workshop.id,
                    workshop.title,
                    workshop.description,
                    workshop.date_time,
                    workshop.capacity,
                    DEMO_ORGANIZER.0,
                    DEMO_ORGANIZER.1,
                ],
            )?;
        }
        for (id, workshop_id, name, email, registered_at) in DEMO_REGISTRATIONS {
            tx.execute(
                "INSERT INTO registrations (id, workshop_id, name, email, status, registered_at)
                 VALUES (?1, ?2, ?3, ?4, 'enrolled', ?5);",
                params![id, workshop_id, name, email, registered_at],
            )?;
        }
        tx.commit()?;
        report.workshops = DEMO_WORKSHOPS.len();
        report.registrations = DEMO_REGISTRATIONS.len();
    }

    info!(
        "event=db_seed module=db status=ok users={} workshops={} registrations={}",
        report.users, report.workshops, report.registrations
    );
    Ok(report)
}

fn table_is_empty(conn: &Connection, table: &'static str) -> DbResult<bool> {
    let count: i64 = conn.query_row(&format!("SELECT COUNT(*) FROM {table};"), [], |row| {
        row.get(0)
    })?;
    Ok(count == 0)
}
