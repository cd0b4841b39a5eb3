pub const HEADLINE: &str = "Chat with your PDFs using AI";
pub const TAGLINE: &str = "Upload your documents and get instant answers from our advanced AI assistant. No more scrolling through pages to find what you need.";

pub struct Step {
    pub title: &'static str,
    pub body: &'static str,
}

pub const HOW_IT_WORKS: [Step; 3] = [
    Step {
        title: "Upload Your PDFs",
        body: "Simply upload your PDF documents to our secure platform.",
    },
    Step {
        title: "Instant Processing",
        body: "Our AI quickly analyzes and understands the content of your documents.",
    },
    Step {
        title: "Chat & Get Answers",
        body: "Ask questions about your document and receive accurate, contextual responses.",
    },
];
