// 固定提示词模板和面向用户的标签
//
// 报告以法语撰写，提示词和展示给学生/教师的文字保持法语

/// 标题识别提示词（后接文档开头部分）
pub const TITLE_DISCOVERY_PROMPT: &str = "\
Le texte ci-dessous est un rapport de stage ou un projet étudiant.
Votre tâche est d'analyser le contenu et de lister UNIQUEMENT les titres de sections qui représentent des chapitres ou parties substantielles et intéressantes pour l'évaluation (ex: Introduction, Problématique, État de l'art, Méthodologie, Résultats, Conclusion).

Excluez les titres trop courts ou génériques (ex: Table des matières, Auteurs, Remerciements).

Renvoyez la liste des titres détectés, chacun sur une nouvelle ligne, sans numérotation, sans explication ni texte additionnel.

Texte du Rapport (Début):
";

/// 问题生成提示词
pub const QUESTION_PROMPT: &str = "\
Role : Vous êtes un expert en pédagogie et en évaluation. Votre tâche est d'analyser le texte du chapitre ci-dessous et de générer une série de questions pertinentes pour évaluer la compréhension et la réflexion d'un étudiant. Le titre du chapitre est fourni pour vous aider à contextualiser.

Objectif : Générer 5 questions au total :
- 2 Questions de Compréhension (ex: Comment/Expliquez/Décrivez)
- 2 Questions sur les Concepts Clés (ex: Définissez/Quel est le rôle de)
- 1 Question de Réflexion Critique (ex: Quelles sont les limites/Comparez/Jugez l'efficacité)

Format de Sortie : Fournissez uniquement une liste numérotée des questions (ex: \"1. Expliquez...\", \"2. Quel est le rôle...\"), sans aucune autre explication ou texte introductif.";

pub const TITLE_PRELIMINARY: &str = "0. Texte Préliminaire (Avant le premier chapitre)";
pub const TITLE_NO_SEGMENTATION: &str = "Document Complet / Aucune segmentation effectuée";
pub const TITLE_NO_CHAPTERS_SUGGESTED: &str = "Document Complet / IA n'a pas détecté de chapitres";
pub const TITLE_CHAPTERS_NOT_FOUND: &str = "Document Complet / Titres IA non trouvables";
pub const TITLE_SEGMENTATION_ERROR: &str = "Erreur de Segmentation (Voir Erreur API)";
pub const TITLE_BACKEND_UNCONFIGURED: &str = "Erreur : Client API non initialisé";

pub const NO_SIGNIFICANT_TEXT: &str = "(Aucun texte significatif trouvé pour ce chapitre.)";
pub const UNCONFIGURED_TITLE: &str = "Erreur Critique";
pub const UNCONFIGURED_MESSAGE: &str =
    "Le client de génération n'est pas initialisé. Vérifiez votre clé API (GEMINI_API_KEY ou CHAPTER_QUIZ_API_KEY).";

/// 单个章节生成失败时的提示信息
pub fn generation_failure(detail: &str) -> String {
    format!("Erreur API lors de la génération. Détail: {}", detail)
}

/// 拼接标题识别提示词
pub fn title_discovery(excerpt: &str) -> String {
    format!("{}{}", TITLE_DISCOVERY_PROMPT, excerpt)
}

/// 拼接单个章节的问题生成提示词
pub fn chapter_questions(title: &str, body: &str) -> String {
    format!(
        "{}\n\nTitre du Chapitre : {}\n\nTexte du Chapitre :\n{}",
        QUESTION_PROMPT, title, body
    )
}
