//! Default dataset written the first time a document is read from empty
//! storage.

use once_cell::sync::Lazy;
use serde_json::{json, Value};

const GITHUB: &str = "https://github.com/saisumanth-g";

static SEED: Lazy<Value> = Lazy::new(build_seed);

/// A fresh copy of the default document.
pub fn default_document() -> Value {
    SEED.clone()
}

fn college(id: &str, year: &str, slide: u8, title: &str, description: &str) -> Value {
    json!({
        "id": id,
        "year": year,
        "slideIndex": slide.to_string(),
        "title": title,
        "description": description,
        "image": "",
    })
}

fn build_seed() -> Value {
    json!({
        "projects": [
            {
                "id": "p1",
                "title": "Start or Scrap? – Startup Validation Game",
                "description": "An interactive startup idea-validation game that simulates real-world decision-making under time pressure. Users evaluate randomly generated startup ideas using structured validation questions.",
                "tech": ["Python", "Django", "React", "MySQL"],
                "image": "/assets/project-startup.jpg",
                "github": GITHUB,
            },
            {
                "id": "p2",
                "title": "MediGuardian – AI Health Detection",
                "description": "An AI-based healthcare solution that analyzes voice patterns to assist in the early detection of Parkinson's disease.",
                "tech": ["Python", "Flask", "React", "ML"],
                "image": "/assets/project-mediguardian.jpg",
                "github": GITHUB,
            },
            {
                "id": "p3",
                "title": "AI-Based Interior Design Generator",
                "description": "An AI-powered interior design generator developed during internship.",
                "tech": ["Python", "Stable Diffusion", "React"],
                "image": "/assets/project-interior.jpg",
                "github": GITHUB,
            },
            {
                "id": "p4",
                "title": "ESP32 Smart Air Quality Monitor",
                "description": "A hardware project that monitors indoor air quality using ESP32, C programming, and environmental sensors.",
                "tech": ["C", "ESP32", "Sensors"],
                "image": "/assets/project-esp32.jpg",
                "github": GITHUB,
            },
            {
                "id": "p5",
                "title": "Smart Shopping & Billing App",
                "description": "A modern shopping website with online billing and invoice generation.",
                "tech": ["HTML", "CSS", "JavaScript", "Django", "MySQL"],
                "image": "/assets/project-shopping.jpg",
                "github": GITHUB,
            },
        ],
        "internships": [
            {
                "id": "i1",
                "company": "Generative AI Developer",
                "role": "Intern",
                "period": "AI-Based Interior Design Generator",
                "description": "Developed an AI-powered interior design generator using Stable Diffusion models and React frontend. Created intelligent room layout suggestions and style recommendations using generative AI techniques.",
                "image": "/assets/internship-ai-design.jpg",
                "website": GITHUB,
                "github": GITHUB,
            },
            {
                "id": "i2",
                "company": "Altruisty",
                "role": "Full Stack Development Intern",
                "period": "Game-based Django Web Application",
                "description": "Built a game-based Django web application with MySQL and interactive UI for enhanced user engagement. Developed RESTful APIs, implemented authentication systems, and optimized database queries for performance.",
                "image": "/assets/internship-altruisty.jpg",
                "website": GITHUB,
                "github": GITHUB,
            },
        ],
        "hackathons": [
            {
                "id": "h1",
                "title": "IDEATHON – PECTEAM 2K24",
                "description": "Participated in an ideation competition focused on innovative problem-solving, presenting creative tech solutions.",
                "image": "/assets/hackathon-ideathon.jpg",
                "github": GITHUB,
            },
            {
                "id": "h2",
                "title": "Infosys Springboard Ideathon",
                "description": "Competed in the Infosys Springboard Ideathon, developing and pitching innovative tech solutions for real-world problems.",
                "image": "/assets/hackathon-infosys.jpg",
                "github": GITHUB,
            },
            {
                "id": "h3",
                "title": "Hackathon – XYNTRA (36 Hours)",
                "description": "Built an AI-powered health monitoring system in 36 hours during the XYNTRA hackathon.",
                "image": "/assets/hackathon-xyntra.jpg",
                "github": GITHUB,
            },
        ],
        "papers": [
            {
                "id": "pa1",
                "title": "ESP32-Based Smart Air Quality Monitoring and Automation System with MANET Distress Alerts",
                "description": "A comprehensive research paper on IoT-based air quality monitoring using ESP32 microcontrollers with MANET integration for emergency distress alerts.",
                "pdf": "",
            },
            {
                "id": "pa2",
                "title": "Fingerprint-Based Gender Classification using IVMD-Attention EfficientNet-B1",
                "description": "Research on applying deep learning models for gender classification using fingerprint biometrics with attention-enhanced EfficientNet architecture.",
                "pdf": "",
            },
        ],
        "certificates": [
            { "id": "c1", "title": "Data Science", "issuer": "NASSCOM", "valid": "2024–2027", "image": "/assets/cert-nasscom.jpg" },
            { "id": "c2", "title": "AWS Cloud Practitioner Essentials", "issuer": "AWS", "valid": "2024–2027", "image": "/assets/cert-aws.jpg" },
            { "id": "c3", "title": "Python for Data Science", "issuer": "NPTEL", "valid": "2024–2027", "image": "/assets/cert-nptel.jpg" },
            { "id": "c4", "title": "Cloud Data Management 2023", "issuer": "Oracle", "valid": "2023–2026", "image": "/assets/cert-oracle.jpg" },
        ],
        "settings": [
            { "id": "s1", "key": "resumePdf", "value": "" },
        ],
        "homeProfile": [
            { "id": "hp1", "name": "Sai Sumanth G", "subtitle": "Full Stack Developer · AI Enthusiast · Builder", "image": "" },
        ],
        "homeAbout": [
            {
                "id": "ha1",
                "content": "A passionate developer with a love for building innovative solutions. Experienced in Full Stack Development, Machine Learning, and Cloud technologies. Exploring the intersection of design and technology to create impactful products. Currently seeking opportunities to make a meaningful contribution in the tech industry.",
            },
        ],
        "homeSkills": [
            { "id": "hs1", "category": "Languages", "skills": r#"["C","C++","Java (Intermediate)","Python (Intermediate)"]"# },
            { "id": "hs2", "category": "Web Development", "skills": r#"["HTML","CSS","JavaScript","Django"]"# },
            { "id": "hs3", "category": "Database", "skills": r#"["MySQL"]"# },
            { "id": "hs4", "category": "Tools & Platforms", "skills": r#"["GitHub","VS Code","Figma","Canva","MySQL"]"# },
        ],
        "homeLinks": [
            { "id": "hl1", "label": "GitHub", "url": GITHUB, "icon": "github" },
            { "id": "hl2", "label": "LeetCode", "url": "https://leetcode.com/u/saisumanth-g", "icon": "leetcode" },
            { "id": "hl3", "label": "HackerRank", "url": "https://www.hackerrank.com/profile/saisumanth_g", "icon": "hackerrank" },
        ],
        "homeCollege": [
            college("hc1", "1st Year", 0, "First Workshop", "Attended a hands-on workshop on Arduino and basic electronics, marking my first step into hardware."),
            college("hc2", "1st Year", 1, "Intro to Programming", "Started learning C and Python fundamentals through college coursework."),
            college("hc3", "1st Year", 2, "College Orientation", "Explored various departments and clubs during the first semester."),
            college("hc4", "1st Year", 3, "Tech Fest", "Participated in first college tech fest and coding competition."),
            college("hc5", "1st Year", 4, "Project Expo", "Presented a basic calculator app built with Python."),
            college("hc6", "2nd Year", 0, "Web Development Bootcamp", "Built first web projects using HTML, CSS, and JavaScript."),
            college("hc7", "2nd Year", 1, "Hackathon Debut", "Participated in first hackathon, building a prototype in 24 hours."),
            college("hc8", "2nd Year", 2, "Database Course", "Learned MySQL and relational database design."),
            college("hc9", "2nd Year", 3, "GitHub Journey", "Started using Git and GitHub for version control."),
            college("hc10", "2nd Year", 4, "Mini Project", "Developed a student management system using Django."),
            college("hc11", "3rd Year", 0, "AI/ML Exploration", "Explored machine learning concepts and built a disease detection model."),
            college("hc12", "3rd Year", 1, "Internship at Altruisty", "Full Stack Development intern working on Django applications."),
            college("hc13", "3rd Year", 2, "Paper Publication", "Started research on ESP32-based smart monitoring systems."),
            college("hc14", "3rd Year", 3, "IDEATHON", "Won recognition at PECTEAM 2K24 ideation competition."),
            college("hc15", "3rd Year", 4, "Cloud Certification", "Completed AWS Cloud Practitioner and Oracle certifications."),
            college("hc16", "4th Year", 0, "Conference Paper", "Published research on ESP32-based smart air quality monitoring system."),
            college("hc17", "4th Year", 1, "Capstone Project", "Developed Start or Scrap startup validation game as final year project."),
            college("hc18", "4th Year", 2, "AI Internship", "Worked on AI-based interior design generator using Stable Diffusion."),
            college("hc19", "4th Year", 3, "Portfolio Website", "Built this personal portfolio to showcase all projects and achievements."),
            college("hc20", "4th Year", 4, "Placement Prep", "Preparing for campus placements and industry roles."),
        ],
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::{Collection, Record};
    use std::collections::HashSet;

    #[test]
    fn test_seed_has_every_collection() {
        let doc = default_document();
        for c in Collection::ALL {
            let arr = doc.get(c.as_str()).and_then(Value::as_array);
            assert!(arr.is_some(), "missing {c}");
            assert!(!arr.unwrap().is_empty(), "empty {c}");
        }
        assert_eq!(doc.as_object().unwrap().len(), Collection::ALL.len());
    }

    #[test]
    fn test_seed_ids_unique_per_collection() {
        let doc = default_document();
        for c in Collection::ALL {
            let records: Vec<Record> = doc[c.as_str()]
                .as_array()
                .unwrap()
                .iter()
                .filter_map(Record::from_value)
                .collect();
            let ids: HashSet<&str> = records.iter().map(|r| r.id.as_str()).collect();
            assert_eq!(ids.len(), records.len(), "duplicate id in {c}");
        }
    }

    #[test]
    fn test_seed_copies_are_independent() {
        let mut a = default_document();
        a["projects"] = json!([]);
        let b = default_document();
        assert_eq!(b["projects"].as_array().unwrap().len(), 5);
        assert_eq!(b["homeCollege"].as_array().unwrap().len(), 20);
    }
}
