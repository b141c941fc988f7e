//! Static modal content, addressed as `(registry, id)`.

use std::sync::OnceLock;

#[derive(Debug, Clone)]
pub struct ProjectEntry {
    pub id: &'static str,
    pub title: &'static str,
    pub description: &'static str,
    pub features: &'static [&'static str],
    pub tech: &'static [&'static str],
}

#[derive(Debug, Clone)]
pub struct TeamEntry {
    pub id: &'static str,
    pub name: &'static str,
    pub role: &'static str,
    pub bio: &'static str,
    pub projects: &'static [&'static str],
    pub skills: &'static [&'static str],
}

/// Build-time content behind the project and team modals.
pub struct ContentRegistry {
    projects: Vec<ProjectEntry>,
    team: Vec<TeamEntry>,
}

static REGISTRY: OnceLock<ContentRegistry> = OnceLock::new();

impl ContentRegistry {
    pub fn get() -> &'static ContentRegistry {
        REGISTRY.get_or_init(|| ContentRegistry {
            projects: default_projects(),
            team: default_team(),
        })
    }

    pub fn project(&self, id: &str) -> Option<&ProjectEntry> {
        self.projects.iter().find(|entry| entry.id == id)
    }

    pub fn team_member(&self, id: &str) -> Option<&TeamEntry> {
        self.team.iter().find(|entry| entry.id == id)
    }

    pub fn projects(&self) -> &[ProjectEntry] {
        &self.projects
    }

    pub fn team(&self) -> &[TeamEntry] {
        &self.team
    }
}

fn default_projects() -> Vec<ProjectEntry> {
    vec![
        ProjectEntry {
            id: "1",
            title: "Autonomous Navigation System",
            description: "Our flagship autonomous navigation system uses advanced computer vision and machine learning algorithms to navigate complex environments. The system features real-time obstacle detection, path planning, and adaptive decision-making capabilities.",
            features: &[
                "Real-time SLAM",
                "LiDAR integration",
                "Vision-based localization",
                "Dynamic path planning",
            ],
            tech: &["Python", "TensorFlow", "ROS", "OpenCV"],
        },
        ProjectEntry {
            id: "2",
            title: "Smart Manufacturing Assistant",
            description: "Industrial robotics platform designed for manufacturing environments. Features predictive maintenance, quality control, and automated assembly processes. Reduces downtime by 40% through AI-powered diagnostics.",
            features: &[
                "Predictive maintenance",
                "Quality control AI",
                "Automated assembly",
                "Real-time monitoring",
            ],
            tech: &["C++", "PyTorch", "Industrial IoT", "Computer Vision"],
        },
        ProjectEntry {
            id: "3",
            title: "Vision Recognition Platform",
            description: "State-of-the-art object detection and classification system capable of identifying thousands of objects in real-time. Used in various applications from security to inventory management.",
            features: &[
                "Real-time detection",
                "Multi-class classification",
                "Edge deployment",
                "99.2% accuracy",
            ],
            tech: &["Python", "YOLO", "TensorRT", "CUDA"],
        },
    ]
}

fn default_team() -> Vec<TeamEntry> {
    vec![
        TeamEntry {
            id: "founder1",
            name: "Alex Chen",
            role: "Co-Founder & Chief Engineer",
            bio: "Alex has over 10 years of experience in robotics engineering and autonomous systems. Previously led the robotics division at a Fortune 500 tech company. Holds a Ph.D. in Mechanical Engineering from MIT.",
            projects: &["Autonomous Navigation System", "Manufacturing Assistant"],
            skills: &["Robotics", "Control Systems", "AI Integration", "Team Leadership"],
        },
        TeamEntry {
            id: "founder2",
            name: "Sarah Williams",
            role: "Co-Founder & AI Director",
            bio: "Sarah is a leading researcher in machine learning and computer vision. Published 30+ papers in top AI conferences. Former research scientist at a major AI lab. Ph.D. in Computer Science from Stanford.",
            projects: &["Vision Recognition Platform", "Deep Learning Pipeline"],
            skills: &["Machine Learning", "Computer Vision", "Deep Learning", "Research"],
        },
    ]
}
