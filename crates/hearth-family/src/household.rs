//! The hand-seeded household used by the reference deployment.
//!
//! Three generations: both sets of grandparents, the parents and an aunt,
//! and two children.  Display names match the subjects of the sample
//! memory events so the two datasets line up.

use hearth_types::{Closeness, FamilyMember, Gender, MemberId};
use tracing::debug;

use crate::graph::FamilyGraph;

fn closeness(value: u8) -> Closeness {
    // Literal ratings below are all within range.
    Closeness::new(value).unwrap_or_default()
}

/// Build the sample household graph.
pub fn sample_family() -> FamilyGraph {
    let grandpa = MemberId::new();
    let grandma = MemberId::new();
    let maternal_grandpa = MemberId::new();
    let maternal_grandma = MemberId::new();
    let dad = MemberId::new();
    let mum = MemberId::new();
    let aunt = MemberId::new();
    let me = MemberId::new();
    let sister = MemberId::new();

    let population = [
        FamilyMember::with_id(grandpa, "爷爷", Gender::Male, 0)
            .with_position(0)
            .with_birth_year(1940)
            .with_spouse(grandma)
            .with_children([dad, aunt])
            .with_description("退休的木匠，喜欢下象棋")
            .with_trait("手巧")
            .with_closeness(closeness(4))
            .with_color("#8D6E63")
            .with_icons(["hammer", "chess"]),
        FamilyMember::with_id(grandma, "奶奶", Gender::Female, 0)
            .with_position(1)
            .with_birth_year(1943)
            .with_spouse(grandpa)
            .with_children([dad, aunt])
            .with_description("包的饺子全家最好吃")
            .with_trait("慈祥")
            .with_closeness(closeness(5))
            .with_color("#EF9A9A")
            .with_icons(["dumpling"])
            .with_memory_count(1),
        FamilyMember::with_id(maternal_grandpa, "外公", Gender::Male, 0)
            .with_position(2)
            .with_birth_year(1938)
            .with_spouse(maternal_grandma)
            .with_children([mum])
            .with_trait("严肃")
            .with_closeness(closeness(3))
            .with_color("#90A4AE"),
        FamilyMember::with_id(maternal_grandma, "外婆", Gender::Female, 0)
            .with_position(3)
            .with_birth_year(1941)
            .with_spouse(maternal_grandpa)
            .with_children([mum])
            .with_trait("爱唱歌")
            .with_closeness(closeness(4))
            .with_color("#CE93D8"),
        FamilyMember::with_id(dad, "爸爸", Gender::Male, 1)
            .with_position(0)
            .with_birth_year(1966)
            .with_spouse(mum)
            .with_parents([grandpa, grandma])
            .with_children([me, sister])
            .with_description("周末总带我们去钓鱼")
            .with_trait("沉稳")
            .with_closeness(closeness(5))
            .with_color("#64B5F6")
            .with_icons(["fishing"])
            .with_memory_count(2),
        FamilyMember::with_id(mum, "妈妈", Gender::Female, 1)
            .with_position(1)
            .with_birth_year(1968)
            .with_spouse(dad)
            .with_parents([maternal_grandpa, maternal_grandma])
            .with_children([me, sister])
            .with_description("中学语文老师")
            .with_trait("温柔")
            .with_closeness(closeness(5))
            .with_color("#F48FB1")
            .with_icons(["book", "flower"])
            .with_memory_count(2),
        FamilyMember::with_id(aunt, "姑姑", Gender::Female, 1)
            .with_position(2)
            .with_birth_year(1970)
            .with_parents([grandpa, grandma])
            .with_trait("爽朗")
            .with_closeness(closeness(3))
            .with_color("#FFCC80"),
        FamilyMember::with_id(me, "我", Gender::Male, 2)
            .with_position(0)
            .with_birth_year(1995)
            .with_parents([dad, mum])
            .with_closeness(closeness(5))
            .with_color("#81C784"),
        FamilyMember::with_id(sister, "妹妹", Gender::Female, 2)
            .with_position(1)
            .with_birth_year(1999)
            .with_parents([dad, mum])
            .with_trait("活泼")
            .with_closeness(closeness(5))
            .with_color("#FFF176"),
    ];

    let mut graph = FamilyGraph::new();
    for member in population {
        graph.add_member(member);
    }
    debug!(members = graph.len(), "seeded sample household");
    graph
}
