//! # Catalog Data
//!
//! The literal catalog tables: mathematics courses, course groups, and every
//! degree program with its three-semester requirement. This module is data,
//! not logic; the partitioning in the parent module is what gives it
//! structure.
//!
//! Last reviewed against the university catalog: 2026-05-18.

use crate::types::{Course, CourseGroup, Major, MajorMathRequirement};

/// Base URL of the university's program catalog.
const CATALOG: &str = "https://catalog.example.edu/programs/";

// =============================================================================
// BUILDERS
// =============================================================================

fn major(number: u16, code: &str, active: bool, name: &str, url_tail: &str) -> Major {
    Major {
        number,
        program_code: code.to_string(),
        active,
        major_name: name.to_string(),
        concentration_name: None,
        catalog_url: format!("{CATALOG}{url_tail}"),
        placeholder: false,
    }
}

fn concentration(
    number: u16,
    code: &str,
    active: bool,
    name: &str,
    conc: &str,
    url_tail: &str,
) -> Major {
    Major {
        concentration_name: Some(conc.to_string()),
        ..major(number, code, active, name, url_tail)
    }
}

fn legacy(number: u16, code: &str, name: &str, url_tail: &str) -> Major {
    Major {
        placeholder: true,
        ..major(number, code, false, name, url_tail)
    }
}

fn req(
    code: &str,
    first: Option<&str>,
    second: Option<&str>,
    third: Option<&str>,
) -> MajorMathRequirement {
    MajorMathRequirement::new(code).with_semesters(first, second, third)
}

// =============================================================================
// COURSES
// =============================================================================

/// Catalog metadata for the mathematics courses referenced by requirements.
#[must_use]
pub fn courses() -> Vec<Course> {
    vec![
        // No-prerequisite core-curriculum courses
        Course::new("M 101", "Math in the Social Sciences", 3, None),
        Course::new("M 105", "Patterns of Phenomena", 3, None),
        Course::new("S 100", "Statistical Literacy", 3, None),
        Course::new("S 201", "General Statistics", 3, None),
        Course::new("S 204", "Statistics With Business Applications", 3, None),
        // Precalculus
        Course::new("M 117", "College Algebra in Context I", 1, Some("MATH 117")),
        Course::new("M 118", "College Algebra in Context II", 1, Some("MATH 118")),
        Course::new("M 120", "College Algebra", 4, None),
        Course::new(
            "M 124",
            "Logarithmic and Exponential Functions",
            1,
            Some("MATH 124"),
        ),
        Course::new("M 125", "Numerical Trigonometry", 1, Some("MATH 125")),
        Course::new("M 126", "Analytic Trigonometry", 1, Some("MATH 126")),
        Course::new("M 127", "Precalculus", 4, None),
        // First-semester calculus
        Course::new("M 141", "Calculus in Management Sciences", 3, None),
        Course::new("M 155", "Calculus for Biological Scientists I", 4, None),
        Course::new("M 156", "Mathematics for Computational Science I", 4, None),
        Course::new("M 157", "One-Year Calculus IA", 1, None),
        Course::new("M 160", "Calculus for Physical Scientists I", 4, None),
        // Beyond the first calculus semester
        Course::new("M 161", "Calculus for Physical Scientists II", 4, None),
        Course::new("M 229", "Matrices and Linear Equations", 2, None),
        Course::new("M 255", "Calculus for Biological Scientists II", 4, None),
        Course::new("M 261", "Calculus for Physical Scientists III", 4, None),
        Course::new("M 271", "Applied Mathematics for Chemists I", 4, None),
        Course::new("M 272", "Applied Mathematics for Chemists II", 4, None),
        Course::new("M 340", "Introduction to Ordinary Differential Equations", 4, None),
        Course::new("M 345", "Differential Equations", 4, None),
        Course::new("M 369", "Linear Algebra I", 3, None),
    ]
}

// =============================================================================
// COURSE GROUPS
// =============================================================================

/// The interchangeable-course pick-lists referenced by requirements.
#[must_use]
pub fn course_groups() -> Vec<CourseGroup> {
    const CORE_LIST: [&str; 16] = [
        "M 101", "S 100", "M 105", "S 201", "S 204", "M 117", "M 118", "M 124", "M 125", "M 126",
        "M 127", "M 141", "M 155", "M 160", "M 161", "M 255",
    ];

    vec![
        // Generic core-curriculum groups
        CourseGroup::new("CORE3", Some(3), "M 101", &CORE_LIST),
        CourseGroup::new("CORE3SOC", Some(3), "M 101", &CORE_LIST),
        CourseGroup::new("CORE2", Some(2), "M 101", &CORE_LIST),
        // Program-family groups
        CourseGroup::new(
            "EDUC3",
            Some(3),
            "M 124",
            &["M 117", "M 118", "M 124", "M 141", "M 155", "M 160"],
        ),
        CourseGroup::new(
            "ANSC3",
            Some(3),
            "M 124",
            &["M 117", "M 118", "M 124", "M 125", "M 126", "M 141", "M 155"],
        ),
        CourseGroup::new(
            "BIOSC3",
            Some(3),
            "M 124",
            &["M 117", "M 118", "M 124", "M 125", "M 126", "M 155", "M 160"],
        ),
        CourseGroup::new(
            "BUS3",
            Some(3),
            "M 124",
            &["M 117", "M 118", "M 124", "M 125", "M 126", "M 141"],
        ),
        CourseGroup::new("NRES3", Some(3), "M 125", &["M 117", "M 118", "M 125", "M 141"]),
        // Calculus alternatives
        CourseGroup::new("CALC", None, "M 141", &["M 141", "M 155", "M 160"]),
        CourseGroup::new("CALCBIO1", None, "M 155", &["M 155", "M 160"]),
        CourseGroup::new("CALCBIO2", None, "M 255", &["M 255", "M 161"]),
        CourseGroup::new("CALCCHEM2", None, "M 161", &["M 161", "M 271"]),
        CourseGroup::new("CALCCHEM3", None, "M 261", &["M 261", "M 272"]),
        CourseGroup::new("CALCCS1", None, "M 156", &["M 156", "M 160"]),
        // Upper-division alternatives
        CourseGroup::new("LINALG", None, "M 229", &["M 229", "M 369"]),
        CourseGroup::new("ODE", None, "M 340", &["M 340", "M 345"]),
    ]
}

// =============================================================================
// MAJORS
// =============================================================================

/// Every degree program with its three-semester mathematics requirement.
#[must_use]
pub fn majors() -> Vec<(Major, MajorMathRequirement)> {
    let mut table: Vec<(Major, MajorMathRequirement)> = Vec::with_capacity(64);
    let mut put = |m: Major, r: MajorMathRequirement| table.push((m, r));

    // ================================
    // College of Agricultural Sciences
    // ================================

    // *** Major in Agricultural Biology (with two concentrations)

    put(
        major(1090, "AGBI-BS", true, "Agricultural Biology", "agricultural-biology"),
        req("AGBI-BS", Some("M 117!,M 118!,M 124!,M 125!"), None, Some("M 155")),
    );
    put(
        concentration(
            1091,
            "AGBI-ENTZ-BS",
            true,
            "Agricultural Biology",
            "Entomology",
            "agricultural-biology-entomology",
        ),
        req("AGBI-ENTZ-BS", Some("M 117!,M 118!,M 124!,M 125!"), None, Some("M 155")),
    );
    put(
        concentration(
            1092,
            "AGBI-PLPZ-BS",
            true,
            "Agricultural Biology",
            "Plant Pathology",
            "agricultural-biology-plant-pathology",
        ),
        req("AGBI-PLPZ-BS", Some("M 117!,M 118!,M 124!,M 125!"), None, Some("M 155")),
    );

    // *** Major in Agricultural Business (with two concentrations)

    put(
        major(1000, "AGBU-BS", true, "Agricultural Business", "agricultural-business"),
        req("AGBU-BS", Some("M 117!,M 118!,M 124"), None, Some("M 141")),
    );
    put(
        concentration(
            1001,
            "AGBU-AECZ-BS",
            true,
            "Agricultural Business",
            "Agricultural Economics",
            "agricultural-business-agricultural-economics",
        ),
        req("AGBU-AECZ-BS", Some("M 117!,M 118!,M 124"), None, Some("M 141")),
    );
    put(
        concentration(
            1002,
            "AGBU-FRCZ-BS",
            true,
            "Agricultural Business",
            "Farm and Ranch Management",
            "agricultural-business-farm-ranch-management",
        ),
        req("AGBU-FRCZ-BS", Some("M 117!,M 118!,M 124"), None, Some("M 141")),
    );

    // *** Major in Agricultural Education (with one concentration)

    put(
        major(1010, "AGED-BS", true, "Agricultural Education", "agricultural-education"),
        req("AGED-BS", Some("EDUC3!"), None, None),
    );
    put(
        concentration(
            1012,
            "AGED-TDLZ-BS",
            true,
            "Agricultural Education",
            "Teacher Development",
            "agricultural-education-teacher-development",
        ),
        req("AGED-TDLZ-BS", None, Some("EDUC3!"), None),
    );

    // *** Major in Animal Science

    put(
        major(1020, "ANIM-BS", true, "Animal Science", "animal-science"),
        req("ANIM-BS", Some("ANSC3!"), None, None),
    );

    // *** Major in Environmental and Natural Resource Economics

    put(
        major(
            1030,
            "ENRE-BS",
            true,
            "Environmental and Natural Resource Economics",
            "environmental-natural-resource-economics",
        ),
        req("ENRE-BS", Some("M 117!,M 118!,M 124"), None, Some("M 141")),
    );

    // *** Major in Horticulture (with one concentration)

    put(
        major(1040, "HORT-BS", true, "Horticulture", "horticulture"),
        req("HORT-BS", Some("CORE3!"), None, None),
    );
    put(
        concentration(
            1041,
            "HORT-FLOZ-BS",
            true,
            "Horticulture",
            "Floriculture",
            "horticulture-floriculture",
        ),
        req("HORT-FLOZ-BS", Some("CORE3!"), None, None),
    );

    // *** Major in Soil and Crop Sciences

    put(
        major(1050, "SOCR-BS", true, "Soil and Crop Sciences", "soil-crop-sciences"),
        req("SOCR-BS", Some("M 117!,M 118!,M 124!"), None, None),
    );

    // ===================
    // College of Business
    // ===================

    // *** Major in Business Administration (with three concentrations)

    put(
        major(2000, "BUSA-BS", true, "Business Administration", "business-administration"),
        req("BUSA-BS", Some("BUS3!"), None, Some("M 141.")),
    );
    put(
        concentration(
            2001,
            "BUSA-ACCZ-BS",
            true,
            "Business Administration",
            "Accounting",
            "business-administration-accounting",
        ),
        req("BUSA-ACCZ-BS", Some("BUS3!"), None, Some("M 141.")),
    );
    put(
        concentration(
            2002,
            "BUSA-FINZ-BS",
            true,
            "Business Administration",
            "Finance",
            "business-administration-finance",
        ),
        req("BUSA-FINZ-BS", Some("BUS3!"), None, Some("M 141.")),
    );
    put(
        concentration(
            2003,
            "BUSA-MKTZ-BS",
            true,
            "Business Administration",
            "Marketing",
            "business-administration-marketing",
        ),
        req("BUSA-MKTZ-BS", Some("BUS3!"), None, Some("M 141.")),
    );

    // *** Major in Economics (B.S.)

    put(
        major(2010, "ECON-BS", true, "Economics", "economics-bs"),
        req("ECON-BS", Some("M 117!,M 118!,M 124!"), Some("M 141!"), None),
    );

    // ======================
    // College of Engineering
    // ======================

    put(
        major(
            3000,
            "CBEG-BS",
            true,
            "Chemical and Biological Engineering",
            "chemical-biological-engineering",
        ),
        req("CBEG-BS", Some("M 160!"), Some("M 161!"), Some("M 261")),
    );
    put(
        major(3010, "CIVE-BS", true, "Civil Engineering", "civil-engineering"),
        req("CIVE-BS", Some("M 160!"), Some("M 161!"), Some("M 261")),
    );
    put(
        major(3020, "CPEG-BS", true, "Computer Engineering", "computer-engineering"),
        req("CPEG-BS", Some("M 160!"), Some("M 161!"), Some("M 261")),
    );
    put(
        major(3030, "ELEG-BS", true, "Electrical Engineering", "electrical-engineering"),
        req("ELEG-BS", Some("M 160!"), Some("M 161!"), Some("M 261")),
    );
    put(
        concentration(
            3031,
            "ELEG-ASPZ-BS",
            true,
            "Electrical Engineering",
            "Aerospace",
            "electrical-engineering-aerospace",
        ),
        req("ELEG-ASPZ-BS", Some("M 160!"), Some("M 161!"), Some("M 261")),
    );
    put(
        major(3040, "MECH-BS", true, "Mechanical Engineering", "mechanical-engineering"),
        req("MECH-BS", Some("M 160!"), Some("M 161!"), Some("M 261")),
    );
    put(
        major(3050, "ENGS-BS", true, "Engineering Science", "engineering-science"),
        req("ENGS-BS", Some("M 160!"), Some("M 161!"), Some("M 261!")),
    );
    put(
        concentration(
            3051,
            "ENGS-TCHZ-BS",
            true,
            "Engineering Science",
            "Teacher Education",
            "engineering-science-teacher-education",
        ),
        req("ENGS-TCHZ-BS", Some("M 160!"), Some("M 161!"), Some("M 261!")),
    );

    // ====================================
    // College of Health and Human Sciences
    // ====================================

    put(
        major(4000, "ECHE-BS", true, "Early Childhood Education", "early-childhood-education"),
        req("ECHE-BS", Some("CORE3!"), None, None),
    );
    put(
        major(
            4010,
            "FACS-BS",
            true,
            "Family and Consumer Sciences",
            "family-consumer-sciences",
        ),
        req("FACS-BS", Some("CORE3!"), None, None),
    );
    put(
        concentration(
            4011,
            "FACS-IDSZ-BS",
            true,
            "Family and Consumer Sciences",
            "Interior Design",
            "family-consumer-sciences-interior-design",
        ),
        req("FACS-IDSZ-BS", Some("CORE3!"), None, None),
    );
    put(
        major(
            4020,
            "HAES-BS",
            true,
            "Health and Exercise Science",
            "health-exercise-science",
        ),
        req("HAES-BS", Some("M 118!,M 124!,M 125!"), None, None),
    );
    put(
        concentration(
            4021,
            "HAES-SPMZ-BS",
            true,
            "Health and Exercise Science",
            "Sports Medicine",
            "health-exercise-science-sports-medicine",
        ),
        req("HAES-SPMZ-BS", Some("M 118!,M 124!,M 125!"), None, None),
    );
    put(
        major(
            4030,
            "HDFS-BS",
            true,
            "Human Development and Family Studies",
            "human-development-family-studies",
        ),
        req("HDFS-BS", Some("CORE3!"), None, None),
    );
    put(
        major(4040, "NUFS-BS", true, "Nutrition and Food Science", "nutrition-food-science"),
        req("NUFS-BS", Some("M 117!,M 118!,M 124!"), Some("BIOSC3"), None),
    );
    put(
        major(4050, "SOWK-BS", true, "Social Work", "social-work"),
        req("SOWK-BS", Some("CORE3SOC!"), None, None),
    );

    // =======================
    // College of Liberal Arts
    // =======================

    put(
        major(5000, "ANTH-BA", true, "Anthropology", "anthropology"),
        req("ANTH-BA", Some("CORE3SOC!"), None, None),
    );
    put(
        major(5010, "JOUR-BA", true, "Journalism and Media Communication", "journalism"),
        req("JOUR-BA", Some("CORE3!"), None, None),
    );
    put(
        major(5020, "POLS-BA", true, "Political Science", "political-science"),
        req("POLS-BA", Some("CORE3SOC!"), None, None),
    );
    put(
        major(5030, "PSYC-BS", true, "Psychology", "psychology"),
        req("PSYC-BS", Some("M 117!,M 118!"), Some("S 201"), None),
    );
    put(
        concentration(
            5031,
            "PSYC-ADCZ-BS",
            true,
            "Psychology",
            "Addictions Counseling",
            "psychology-addictions-counseling",
        ),
        req("PSYC-ADCZ-BS", Some("M 117!,M 118!"), Some("S 201"), None),
    );
    put(
        major(5040, "SOC-BA", true, "Sociology", "sociology"),
        req("SOC-BA", Some("CORE3SOC!"), None, None),
    );

    // *** Major in Economics (B.A.) — distinct program, same display name
    // as the B.S.; both are real majors and both appear.

    put(
        major(5050, "ECON-BA", true, "Economics", "economics-ba"),
        req("ECON-BA", Some("M 117!,M 118!,M 124!"), Some("M 141"), None),
    );

    // ============================
    // College of Natural Resources
    // ============================

    put(
        major(
            6000,
            "ECSY-BS",
            true,
            "Ecosystem Science and Sustainability",
            "ecosystem-science-sustainability",
        ),
        req("ECSY-BS", Some("M 117!,M 118!,M 124!,M 125!"), Some("M 141!"), None),
    );
    put(
        major(
            6010,
            "FRRS-BS",
            true,
            "Forest and Rangeland Stewardship",
            "forest-rangeland-stewardship",
        ),
        req("FRRS-BS", Some("NRES3!"), None, None),
    );
    put(
        concentration(
            6011,
            "FRRS-FORZ-BS",
            true,
            "Forest and Rangeland Stewardship",
            "Forest Management",
            "forest-rangeland-stewardship-forest-management",
        ),
        req("FRRS-FORZ-BS", Some("NRES3!"), None, None),
    );
    put(
        major(6020, "GEOL-BS", true, "Geology", "geology"),
        req("GEOL-BS", Some("M 124!,M 125!,M 126!"), Some("M 160!"), Some("M 161")),
    );
    put(
        major(
            6030,
            "WSSC-BS",
            true,
            "Watershed Science and Sustainability",
            "watershed-science",
        ),
        req("WSSC-BS", Some("M 117!,M 118!,M 124!,M 125!"), Some("M 155!,M 160."), None),
    );

    // ===========================
    // College of Natural Sciences
    // ===========================

    // *** Major in Biological Science (with two concentrations)

    put(
        major(7000, "BIOS-BS", true, "Biological Science", "biological-science"),
        req("BIOS-BS", Some("BIOSC3!"), Some("CALCBIO1"), None),
    );
    put(
        concentration(
            7001,
            "BIOS-BTNZ-BS",
            true,
            "Biological Science",
            "Botany",
            "biological-science-botany",
        ),
        req("BIOS-BTNZ-BS", Some("BIOSC3!"), Some("CALCBIO1"), None),
    );
    put(
        concentration(
            7002,
            "BIOS-ZOOZ-BS",
            true,
            "Biological Science",
            "Zoology",
            "biological-science-zoology",
        ),
        req("BIOS-ZOOZ-BS", Some("BIOSC3!"), Some("CALCBIO1"), None),
    );

    // *** Major in Biochemistry (with one concentration)

    put(
        major(7010, "BCHM-BS", true, "Biochemistry", "biochemistry"),
        req("BCHM-BS", Some("M 160!"), Some("M 161!"), None),
    );
    put(
        concentration(
            7011,
            "BCHM-PMDZ-BS",
            true,
            "Biochemistry",
            "Pre-Medicine",
            "biochemistry-pre-medicine",
        ),
        req("BCHM-PMDZ-BS", Some("M 160!"), Some("M 161!"), None),
    );

    // *** Major in Chemistry

    put(
        major(7020, "CHEM-BS", true, "Chemistry", "chemistry"),
        req("CHEM-BS", Some("M 160!"), Some("CALCCHEM2!"), Some("CALCCHEM3")),
    );

    // *** Major in Computer Science (with two concentrations)

    put(
        major(7030, "CPSC-BS", true, "Computer Science", "computer-science"),
        req("CPSC-BS", Some("CALCCS1!"), Some("M 161!"), Some("LINALG")),
    );
    put(
        concentration(
            7031,
            "CPSC-SEGZ-BS",
            true,
            "Computer Science",
            "Software Engineering",
            "computer-science-software-engineering",
        ),
        req("CPSC-SEGZ-BS", Some("CALCCS1!"), Some("M 161!"), Some("LINALG")),
    );
    put(
        concentration(
            7032,
            "CPSC-CSYZ-BS",
            true,
            "Computer Science",
            "Computing Systems",
            "computer-science-computing-systems",
        ),
        req("CPSC-CSYZ-BS", Some("CALCCS1!"), Some("M 161!"), Some("LINALG")),
    );

    // *** Major in Data Science

    put(
        major(7040, "DSCI-BS", true, "Data Science", "data-science"),
        req("DSCI-BS", Some("M 156!"), Some("M 161!"), Some("M 229!")),
    );

    // *** Major in Mathematics (with two concentrations)

    put(
        major(7050, "MATH-BS", true, "Mathematics", "mathematics"),
        req("MATH-BS", Some("M 160!"), Some("M 161!"), Some("M 261!")),
    );
    put(
        concentration(
            7051,
            "MATH-ALSZ-BS",
            true,
            "Mathematics",
            "Actuarial Sciences",
            "mathematics-actuarial-sciences",
        ),
        req("MATH-ALSZ-BS", Some("M 160!"), Some("M 161!"), Some("M 261!")),
    );
    put(
        concentration(
            7052,
            "MATH-AMTZ-BS",
            true,
            "Mathematics",
            "Applied Mathematics",
            "mathematics-applied-mathematics",
        ),
        req("MATH-AMTZ-BS", Some("M 160!"), Some("M 161!"), Some("M 261!")),
    );

    // *** Major in Physics

    put(
        major(7060, "PHYS-BS", true, "Physics", "physics"),
        req("PHYS-BS", Some("M 160!"), Some("M 161!"), Some("M 261!")),
    );

    // *** Major in Statistics

    put(
        major(7070, "STAT-BS", true, "Statistics", "statistics"),
        req("STAT-BS", Some("M 156!,M 160!"), Some("M 161!"), Some("M 229")),
    );

    // *** Legacy program code retained for declared students

    put(
        legacy(7090, "ZOOL-BS", "Zoology", "zoology"),
        req("ZOOL-BS", Some("BIOSC3!"), None, None),
    );

    // ===================
    // Exploratory Studies
    // ===================

    put(
        major(
            900,
            "EXPL-LAR",
            true,
            "Exploratory Studies - Arts and Humanities",
            "exploratory-arts-humanities",
        ),
        req("EXPL-LAR", Some("CORE3!"), None, None),
    );
    put(
        major(
            901,
            "EXPL-PHS",
            true,
            "Exploratory Studies - Physical Sciences",
            "exploratory-physical-sciences",
        ),
        req("EXPL-PHS", Some("M 117!,M 118!,M 124!,M 125!,M 126!"), Some("M 160"), None),
    );

    table
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn program_codes_unique() {
        let table = majors();
        let mut codes: Vec<&str> = table.iter().map(|(m, _)| m.program_code.as_str()).collect();
        codes.sort_unstable();
        let before = codes.len();
        codes.dedup();
        assert_eq!(before, codes.len());
    }

    #[test]
    fn requirement_codes_match_major_codes() {
        for (major, req) in majors() {
            assert_eq!(major.program_code, req.program_code);
        }
    }

    #[test]
    fn every_group_key_in_requirements_exists() {
        let groups = course_groups();
        let course_codes: Vec<String> =
            courses().into_iter().map(|c| c.course_id.0).collect();

        for (_, req) in majors() {
            for opt in req.all_options() {
                let known_group = groups.iter().any(|g| g.group_id == opt.key);
                let known_course = course_codes.contains(&opt.key);
                assert!(
                    known_group || known_course,
                    "unknown option key: {}",
                    opt.key
                );
            }
        }
    }

    #[test]
    fn group_defaults_appear_in_their_lists() {
        for group in course_groups() {
            assert!(
                group.courses.contains(&group.default_course),
                "default course missing from {}",
                group.group_id
            );
        }
    }
}
