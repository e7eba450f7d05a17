// Reducers de colecciones por id, compartidos por company y employee

use crate::models::{EntityId, Identified};

/// Reemplaza el elemento con el mismo id. Devuelve false (sin cambios) si no está.
pub fn replace_by_id<T: Identified>(items: &mut [T], updated: T) -> bool {
    match items.iter_mut().find(|item| item.id() == updated.id()) {
        Some(slot) => {
            *slot = updated;
            true
        }
        None => {
            log::debug!("🔍 [STORE] id {} no está en la colección, nada que reemplazar", updated.id());
            false
        }
    }
}

/// Quita todos los elementos con ese id. Devuelve cuántos se quitaron.
pub fn remove_by_id<T: Identified>(items: &mut Vec<T>, id: &EntityId) -> usize {
    let before = items.len();
    items.retain(|item| item.id() != id);
    before - items.len()
}

/// Añade al final; si el id ya existía, lo reemplaza para no duplicarlo
pub fn upsert<T: Identified>(items: &mut Vec<T>, item: T) {
    if let Some(existing) = items.iter_mut().find(|existing| existing.id() == item.id()) {
        *existing = item;
    } else {
        items.push(item);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Department;

    fn department(id: u64, name: &str) -> Department {
        Department { id: id.into(), name: name.to_string(), description: None }
    }

    #[test]
    fn test_replace_missing_id_is_a_no_op() {
        let mut items = vec![department(1, "Sales")];
        assert!(!replace_by_id(&mut items, department(2, "Ops")));
        assert_eq!(items, vec![department(1, "Sales")]);

        assert!(replace_by_id(&mut items, department(1, "Sales EU")));
        assert_eq!(items[0].name, "Sales EU");
    }

    #[test]
    fn test_remove_and_upsert() {
        let mut items = vec![department(1, "Sales"), department(2, "Ops")];
        assert_eq!(remove_by_id(&mut items, &EntityId::from("2")), 1);
        assert_eq!(remove_by_id(&mut items, &EntityId::from("2")), 0);

        upsert(&mut items, department(3, "HR"));
        upsert(&mut items, department(3, "People"));
        assert_eq!(items.len(), 2);
        assert_eq!(items[1].name, "People");
    }
}
