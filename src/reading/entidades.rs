//! Built-in catalog of the 32 states (and the national aggregate) with
//! the common names used across every output, instead of the official
//! long forms (`Coahuila de Zaragoza`, `Veracruz de Ignacio de la Llave`, ...).

/// (cve_ent, common name). `00` is the national aggregate.
pub const ENTIDADES: [(&str, &str); 33] = [
    ("00", "República Mexicana"),
    ("01", "Aguascalientes"),
    ("02", "Baja California"),
    ("03", "Baja California Sur"),
    ("04", "Campeche"),
    ("05", "Coahuila"),
    ("06", "Colima"),
    ("07", "Chiapas"),
    ("08", "Chihuahua"),
    ("09", "Ciudad de México"),
    ("10", "Durango"),
    ("11", "Guanajuato"),
    ("12", "Guerrero"),
    ("13", "Hidalgo"),
    ("14", "Jalisco"),
    ("15", "Estado de México"),
    ("16", "Michoacán"),
    ("17", "Morelos"),
    ("18", "Nayarit"),
    ("19", "Nuevo León"),
    ("20", "Oaxaca"),
    ("21", "Puebla"),
    ("22", "Querétaro"),
    ("23", "Quintana Roo"),
    ("24", "San Luis Potosí"),
    ("25", "Sinaloa"),
    ("26", "Sonora"),
    ("27", "Tabasco"),
    ("28", "Tamaulipas"),
    ("29", "Tlaxcala"),
    ("30", "Veracruz"),
    ("31", "Yucatán"),
    ("32", "Zacatecas"),
];

/// Common name of a state by its two-digit code.
pub fn common_name(cve_ent: &str) -> Option<&'static str> {
    ENTIDADES
        .iter()
        .find(|(cve, _)| *cve == cve_ent)
        .map(|(_, nombre)| *nombre)
}

// -- Tests -------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_resolve_common_names() {
        assert_eq!(common_name("05"), Some("Coahuila"));
        assert_eq!(common_name("30"), Some("Veracruz"));
        assert_eq!(common_name("00"), Some("República Mexicana"));
    }

    #[test]
    fn should_return_none_for_unknown_code() {
        assert_eq!(common_name("33"), None);
        assert_eq!(common_name("5"), None);
    }
}
